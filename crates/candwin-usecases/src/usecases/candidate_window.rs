//! Connection to the out-of-process candidate window.
//!
//! `CandidateWindow` owns the single helper session. It spawns the helper on
//! demand, writes command frames to its stdin and reads selection events from
//! its stdout once the host loop reports the pipe readable. Every failure
//! degrades the window to a disconnected or inert state: the input method
//! keeps working without candidate display.

use std::io;
use std::io::Read;
use std::io::Write;
use std::os::fd::RawFd;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::domain::CandidateBatch;
use crate::domain::CandidateCommand;
use crate::domain::CandidateEvent;
use crate::domain::InboundEvent;
use crate::domain::READ_CHUNK_SIZE;
use crate::domain::decode_chunk;
use crate::domain::parse_chunk;
use crate::usecases::command_resolver::CommandResolver;
use crate::usecases::ports::HelperChild;
use crate::usecases::ports::HelperReader;
use crate::usecases::ports::LauncherHandle;
use crate::usecases::ports::NotifierHandle;
use crate::usecases::ports::ReapStatus;
use crate::usecases::ports::Readiness;
use crate::usecases::ports::WatchCallback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Delivered,
    /// No live session; nothing was written.
    NoSession,
    /// The peer is gone and the session was torn down.
    ConnectionLost,
    /// Some other write error. The session is kept.
    WriteFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    NoSession,
    /// Nothing to read right now.
    Idle,
    Closed,
    PeerError,
    Ignored,
    Event(CandidateEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No helper program is configured.
    Unresolved,
    /// Not spawned yet, or torn down.
    Disconnected,
    /// The spawn failed; the window stays silent until torn down.
    Inert { command: PathBuf },
    Connected {
        pid: Option<u32>,
        command: PathBuf,
        started_at: DateTime<Utc>,
        watching: bool,
    },
}

impl SessionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, SessionStatus::Connected { .. })
    }
}

struct Connection {
    command: PathBuf,
    started_at: DateTime<Utc>,
    child: Box<dyn HelperChild>,
    reader: Box<dyn HelperReader>,
    writer: Box<dyn Write + Send>,
    watched_fd: Option<RawFd>,
}

enum SessionState {
    Disconnected,
    Inert { command: PathBuf },
    Connected(Connection),
}

pub struct CandidateWindow {
    resolver: CommandResolver,
    launcher: LauncherHandle,
    notifier: NotifierHandle,
    state: SessionState,
    /// Torn-down helpers whose exit status has not been collected yet.
    retired: Vec<Box<dyn HelperChild>>,
    ready_tx: Sender<RawFd>,
    ready_rx: Receiver<RawFd>,
    events: Sender<CandidateEvent>,
}

impl CandidateWindow {
    pub fn new(
        resolver: CommandResolver,
        launcher: LauncherHandle,
        notifier: NotifierHandle,
        events: Sender<CandidateEvent>,
    ) -> Self {
        let (ready_tx, ready_rx) = crossbeam_channel::unbounded();
        Self {
            resolver,
            launcher,
            notifier,
            state: SessionState::Disconnected,
            retired: Vec::new(),
            ready_tx,
            ready_rx,
            events,
        }
    }

    /// Returns the live session, spawning the helper if there is none.
    ///
    /// Safe to call any number of times. Without a resolvable program no
    /// spawn is attempted. A failed spawn leaves the window inert, and it is
    /// not retried until the session is torn down.
    pub fn acquire(&mut self) -> SessionStatus {
        self.reap_retired();
        let Some(command) = self.resolver.resolve().map(Path::to_path_buf) else {
            return SessionStatus::Unresolved;
        };

        if matches!(self.state, SessionState::Disconnected) {
            self.state = self.spawn(command);
        }
        self.status()
    }

    pub fn status(&self) -> SessionStatus {
        match &self.state {
            SessionState::Disconnected => match self.resolver.is_resolved() {
                Some(false) => SessionStatus::Unresolved,
                _ => SessionStatus::Disconnected,
            },
            SessionState::Inert { command } => SessionStatus::Inert {
                command: command.clone(),
            },
            SessionState::Connected(conn) => SessionStatus::Connected {
                pid: conn.child.pid(),
                command: conn.command.clone(),
                started_at: conn.started_at,
                watching: conn.watched_fd.is_some(),
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected(_))
    }

    /// Descriptor registered with the host notifier, if any.
    pub fn watched_fd(&self) -> Option<RawFd> {
        match &self.state {
            SessionState::Connected(conn) => conn.watched_fd,
            _ => None,
        }
    }

    /// Drops the cached program path; the next `acquire` resolves again.
    pub fn forget_command(&mut self) {
        self.resolver.forget();
    }

    fn spawn(&self, command: PathBuf) -> SessionState {
        let pipes = match self.launcher.launch(&command) {
            Ok(pipes) => pipes,
            Err(err) => {
                warn!(
                    command = %command.display(),
                    error = %err,
                    suggestion = %err.suggestion(),
                    "Candidate window helper unavailable, continuing without it"
                );
                return SessionState::Inert { command };
            }
        };

        let watched_fd = self.watch_reader(pipes.reader.as_ref());
        info!(
            command = %command.display(),
            pid = ?pipes.child.pid(),
            watching = watched_fd.is_some(),
            "Candidate window helper started"
        );

        SessionState::Connected(Connection {
            command,
            started_at: Utc::now(),
            child: pipes.child,
            reader: pipes.reader,
            writer: pipes.writer,
            watched_fd,
        })
    }

    /// Outbound commands keep working when this fails; only selection
    /// events are lost.
    fn watch_reader(&self, reader: &dyn HelperReader) -> Option<RawFd> {
        let Some(fd) = reader.raw_fd().filter(|fd| *fd >= 0) else {
            warn!("Candidate window read pipe has no descriptor, selection events disabled");
            return None;
        };

        if let Err(err) = reader.set_nonblocking() {
            warn!(fd, error = %err, "Failed to make candidate window pipe non-blocking");
            return None;
        }

        let ready_tx = self.ready_tx.clone();
        let callback: WatchCallback = Box::new(move |fd, _readiness| {
            let _ = ready_tx.send(fd);
        });
        match self.notifier.register(fd, Readiness::Readable, callback) {
            Ok(()) => Some(fd),
            Err(err) => {
                warn!(fd, error = %err, "Failed to watch candidate window pipe");
                None
            }
        }
    }

    pub fn activate(&mut self, batch: &CandidateBatch) -> SendStatus {
        self.send(CandidateCommand::Activate(batch))
    }

    pub fn set_nr_candidates(&mut self, count: i32, display_limit: i32) -> SendStatus {
        self.send(CandidateCommand::SetNrCandidates {
            count,
            display_limit,
        })
    }

    pub fn set_page_candidates(&mut self, page: i32, candidates: &[String]) -> SendStatus {
        self.send(CandidateCommand::SetPageCandidates { page, candidates })
    }

    pub fn show_page(&mut self, page: i32) -> SendStatus {
        self.send(CandidateCommand::ShowPage { page })
    }

    pub fn select(&mut self, index: i32, need_hilite: bool) -> SendStatus {
        self.send(CandidateCommand::Select { index, need_hilite })
    }

    pub fn deactivate(&mut self) -> SendStatus {
        self.send(CandidateCommand::Deactivate)
    }

    pub fn show(&mut self) -> SendStatus {
        self.send(CandidateCommand::Show)
    }

    pub fn hide(&mut self) -> SendStatus {
        self.send(CandidateCommand::Hide)
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> SendStatus {
        self.send(CandidateCommand::Move { x, y })
    }

    pub fn show_caret_state(&mut self, text: &str, timeout: i32) -> SendStatus {
        self.send(CandidateCommand::ShowCaretState { text, timeout })
    }

    pub fn update_caret_state(&mut self) -> SendStatus {
        self.send(CandidateCommand::UpdateCaretState)
    }

    pub fn hide_caret_state(&mut self) -> SendStatus {
        self.send(CandidateCommand::HideCaretState)
    }

    /// Writes one frame and flushes it before returning.
    pub fn send(&mut self, command: CandidateCommand<'_>) -> SendStatus {
        let result = {
            let SessionState::Connected(conn) = &mut self.state else {
                return SendStatus::NoSession;
            };
            let frame = command.encode();
            conn.writer
                .write_all(frame.as_bytes())
                .and_then(|()| conn.writer.flush())
                .map(|()| frame.len())
        };

        match result {
            Ok(bytes) => {
                debug!(verb = command.verb(), bytes, "Sent candidate window frame");
                SendStatus::Delivered
            }
            Err(err) => self.check_connection(command.verb(), &err),
        }
    }

    fn check_connection(&mut self, verb: &str, err: &io::Error) -> SendStatus {
        if is_broken_connection(err) {
            warn!(verb, error = %err, "Candidate window helper went away");
            self.teardown();
            return SendStatus::ConnectionLost;
        }
        warn!(verb, error = %err, "Failed to write candidate window frame");
        SendStatus::WriteFailed
    }

    /// Services readiness reported by the host notifier since the last call.
    ///
    /// Reads at most one chunk per notification. Returns the number of
    /// selection events forwarded.
    pub fn dispatch_ready(&mut self) -> usize {
        self.reap_retired();
        let mut forwarded = 0;
        while let Ok(fd) = self.ready_rx.try_recv() {
            if self.watched_fd() != Some(fd) {
                debug!(fd, "Ignoring readiness for a retired descriptor");
                continue;
            }
            if matches!(self.read_event(), ReadOutcome::Event(_)) {
                forwarded += 1;
            }
        }
        forwarded
    }

    /// Reads and handles one chunk from the helper.
    pub fn read_event(&mut self) -> ReadOutcome {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let read = {
            let SessionState::Connected(conn) = &mut self.state else {
                return ReadOutcome::NoSession;
            };
            conn.reader.read(&mut buf[..READ_CHUNK_SIZE - 1])
        };

        let n = match read {
            Ok(0) => {
                info!("Candidate window helper closed its output");
                self.teardown();
                return ReadOutcome::Closed;
            }
            Ok(n) => n,
            Err(err) => {
                if !matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) {
                    debug!(error = %err, "Candidate window read failed, will retry");
                }
                return ReadOutcome::Idle;
            }
        };

        let chunk = decode_chunk(&buf[..n]);
        match parse_chunk(&chunk) {
            InboundEvent::PeerError => {
                warn!("Candidate window helper reported an error");
                self.teardown();
                ReadOutcome::PeerError
            }
            InboundEvent::Index(index) => {
                let event = CandidateEvent::Selected { index };
                debug!(index, "Candidate selected in window");
                if self.events.send(event).is_err() {
                    debug!(index, "No input context bridge listening, selection dropped");
                }
                ReadOutcome::Event(event)
            }
            InboundEvent::Unrecognized(verb) => {
                debug!(verb = %verb, "Ignoring unrecognized candidate window message");
                ReadOutcome::Ignored
            }
        }
    }

    /// Closes the pipes and forgets the session. No respawn happens here.
    pub fn terminate(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let conn = match std::mem::replace(&mut self.state, SessionState::Disconnected) {
            SessionState::Connected(conn) => conn,
            SessionState::Inert { command } => {
                debug!(command = %command.display(), "Cleared inert candidate window session");
                return;
            }
            SessionState::Disconnected => return,
        };

        let Connection {
            command,
            child,
            reader,
            writer,
            watched_fd,
            ..
        } = conn;

        if let Some(fd) = watched_fd {
            self.notifier.unregister(fd);
        }
        drop(reader);
        drop(writer);

        info!(command = %command.display(), pid = ?child.pid(), "Candidate window connection closed");
        self.retired.push(child);
        self.reap_retired();
    }

    /// Number of torn-down helpers still waiting to be reaped.
    pub fn retired_helpers(&self) -> usize {
        self.retired.len()
    }

    /// Collects exit statuses without blocking. Helpers are never killed:
    /// closing stdin is their shutdown signal.
    fn reap_retired(&mut self) {
        self.retired.retain_mut(|child| match child.try_reap() {
            Ok(ReapStatus::Running) => true,
            Ok(ReapStatus::Exited(code)) => {
                info!(pid = ?child.pid(), code = ?code, "Candidate window helper exited");
                false
            }
            Err(err) => {
                debug!(pid = ?child.pid(), error = %err, "Failed to reap candidate window helper");
                false
            }
        });
    }
}

impl Drop for CandidateWindow {
    fn drop(&mut self) {
        self.teardown();
        if !self.retired.is_empty() {
            debug!(
                count = self.retired.len(),
                "Candidate window helpers still running at shutdown"
            );
        }
    }
}

/// True for the write errors that mean the helper is gone.
pub fn is_broken_connection(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe || err.raw_os_error() == Some(libc::EBADF)
}
