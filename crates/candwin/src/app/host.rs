//! Debug host: one poll loop, one candidate window, one console context.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::TryRecvError;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::app::console::Console;
use crate::app::console::ConsoleContext;
use crate::app::console::ConsoleContexts;
use crate::app::script::DriverCommand;
use crate::app::script::parse_line;
use crate::domain::CandidateBatch;
use crate::infra::BridgeConfig;
use crate::infra::PollLoop;
use crate::infra::ProcessLauncher;
use crate::infra::SymbolTable;
use crate::usecases::CandidateWindow;
use crate::usecases::CommandResolver;
use crate::usecases::InputContextBridge;
use crate::usecases::SendStatus;
use crate::usecases::SessionStatus;
use crate::usecases::event_channel;
use crate::usecases::ports::NotifierError;
use crate::usecases::ports::NotifierHandle;

const CONSOLE_CONTEXT: &str = "console";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Sent(SendStatus),
    Handled,
    Quit,
}

pub struct BridgeHost {
    poll_loop: Arc<PollLoop>,
    window: CandidateWindow,
    bridge: InputContextBridge,
    contexts: ConsoleContexts,
    console: Console,
    poll_interval: Duration,
}

impl BridgeHost {
    pub fn new(config: &BridgeConfig, symbols: SymbolTable, console: Console) -> Self {
        let poll_loop = Arc::new(PollLoop::new());
        let notifier: NotifierHandle = poll_loop.clone();
        let resolver = CommandResolver::new(config.resolver_settings(), Arc::new(symbols));
        let (events_tx, events_rx) = event_channel();
        let window = CandidateWindow::new(
            resolver,
            Arc::new(ProcessLauncher::new()),
            notifier,
            events_tx,
        );
        let context = Arc::new(ConsoleContext::new(CONSOLE_CONTEXT, console.clone()));

        Self {
            poll_loop,
            window,
            bridge: InputContextBridge::new(events_rx),
            contexts: ConsoleContexts::new(context),
            console,
            poll_interval: config.poll_interval(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.window.status()
    }

    pub fn contexts(&self) -> &ConsoleContexts {
        &self.contexts
    }

    pub fn poll_loop(&self) -> &PollLoop {
        &self.poll_loop
    }

    /// Opening commands spawn the helper when needed; every other command is
    /// dropped while no helper is connected.
    pub fn execute(&mut self, command: DriverCommand) -> Step {
        let status = match command {
            DriverCommand::Activate {
                display_limit,
                candidates,
            } => {
                self.window.acquire();
                let batch = CandidateBatch::new(candidates, display_limit);
                self.window.activate(&batch)
            }
            DriverCommand::NrCandidates {
                count,
                display_limit,
            } => {
                self.window.acquire();
                self.window.set_nr_candidates(count, display_limit)
            }
            DriverCommand::Caret { timeout, text } => {
                self.window.acquire();
                self.window.show_caret_state(&text, timeout)
            }
            DriverCommand::Page { page, candidates } => {
                self.window.set_page_candidates(page, &candidates)
            }
            DriverCommand::ShowPage(page) => self.window.show_page(page),
            DriverCommand::Select { index, need_hilite } => self.window.select(index, need_hilite),
            DriverCommand::Show => self.window.show(),
            DriverCommand::Hide => self.window.hide(),
            DriverCommand::Deactivate => self.window.deactivate(),
            DriverCommand::Move { x, y } => self.window.move_to(x, y),
            DriverCommand::CaretUpdate => self.window.update_caret_state(),
            DriverCommand::CaretHide => self.window.hide_caret_state(),
            DriverCommand::Focus => {
                self.contexts.focus();
                return Step::Handled;
            }
            DriverCommand::Blur => {
                self.contexts.blur();
                return Step::Handled;
            }
            DriverCommand::Rescan => {
                self.window.forget_command();
                return Step::Handled;
            }
            DriverCommand::Status => {
                self.console.status(&self.window.status());
                return Step::Handled;
            }
            DriverCommand::Quit => return Step::Quit,
        };

        if status != SendStatus::Delivered {
            debug!(status = ?status, "Command not delivered to candidate window");
        }
        Step::Sent(status)
    }

    /// Parses and runs one script line. Bad lines are reported and skipped.
    pub fn execute_line(&mut self, line: &str) -> Step {
        match parse_line(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Step::Handled,
            Err(err) => {
                warn!(error = %err, "Rejected script line");
                self.console.notice(&format!("error: {}", err));
                Step::Handled
            }
        }
    }

    /// One event loop turn: wait for readiness, read the helper, route
    /// selections. Returns the number of selections delivered.
    pub fn pump(&mut self) -> Result<usize, NotifierError> {
        self.pump_for(self.poll_interval)
    }

    pub fn pump_for(&mut self, timeout: Duration) -> Result<usize, NotifierError> {
        self.poll_loop.run_once(timeout)?;
        self.window.dispatch_ready();
        Ok(self.bridge.dispatch_pending(&self.contexts))
    }

    /// Runs until `quit`, end of input or `shutdown`.
    pub fn run(
        &mut self,
        lines: &Receiver<String>,
        shutdown: &AtomicBool,
    ) -> Result<(), NotifierError> {
        info!("Candidate window bridge host running");
        while !shutdown.load(Ordering::Relaxed) {
            loop {
                match lines.try_recv() {
                    Ok(line) => {
                        if self.execute_line(&line) == Step::Quit {
                            self.shutdown();
                            return Ok(());
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.pump()?;
                        self.shutdown();
                        return Ok(());
                    }
                }
            }
            self.pump()?;
        }

        self.shutdown();
        Ok(())
    }

    /// Torn-down helpers whose exit status is still outstanding.
    pub fn retired_helpers(&self) -> usize {
        self.window.retired_helpers()
    }

    pub fn shutdown(&mut self) {
        self.window.terminate();
        info!(
            retired = self.window.retired_helpers(),
            "Shut down candidate window bridge host"
        );
    }
}
