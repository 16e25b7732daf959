use std::io;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

pub mod commands;
pub mod console;
pub mod host;
pub mod input;
pub mod script;

pub use commands::Cli;
pub use commands::OutputFormat;
pub use console::Console;
pub use console::ConsoleContext;
pub use console::ConsoleContexts;
pub use host::BridgeHost;
pub use host::Step;
pub use input::spawn_line_reader;
pub use script::DriverCommand;
pub use script::ScriptError;
pub use script::parse_line;

use crate::common::init_tracing;
use crate::infra::BridgeConfig;
use crate::infra::BridgeError;
use crate::infra::SignalHandler;
use crate::infra::SymbolTable;
use crate::usecases::DEFAULT_PROGRAM_SYMBOL;

/// Exit codes following sysexits.h.
mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const OSERR: i32 = 71;
}

pub struct Application;

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self) -> i32 {
        let cli = Cli::parse();
        let _telemetry = init_tracing(&cli.log_level);

        match self.execute(cli) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => self.handle_error(e),
        }
    }

    fn execute(&self, cli: Cli) -> anyhow::Result<()> {
        let config = config_from_cli(&cli);
        let symbols = symbols_from_cli(&cli);
        debug!(
            libexec = %config.libexec_dir().display(),
            poll_interval_ms = config.poll_interval().as_millis() as u64,
            "Starting candidate window bridge host"
        );

        let shutdown = Arc::new(AtomicBool::new(false));
        let _signal_handler = SignalHandler::setup(Arc::clone(&shutdown))?;
        let lines = spawn_line_reader(BufReader::new(io::stdin()))?;

        let mut host = BridgeHost::new(&config, symbols, Console::stdout(cli.effective_format()));
        host.run(&lines, &shutdown)?;
        Ok(())
    }

    #[allow(clippy::print_stderr)]
    fn handle_error(&self, e: anyhow::Error) -> i32 {
        if let Some(bridge_error) = e.downcast_ref::<BridgeError>() {
            eprintln!("Error: {}", bridge_error);
            eprintln!("Suggestion: {}", bridge_error.suggestion());
            return exit_codes::OSERR;
        }
        eprintln!("Error: {:#}", e);
        exit_codes::GENERAL_ERROR
    }
}

fn config_from_cli(cli: &Cli) -> BridgeConfig {
    let mut config = BridgeConfig::from_env();
    if let Some(dir) = &cli.libexec_dir {
        config = config.with_libexec_dir(dir.clone());
    }
    if let Some(program) = &cli.default_prog {
        config = config.with_default_program(Some(program.clone()));
    }
    if let Some(ms) = cli.poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    config
}

fn symbols_from_cli(cli: &Cli) -> SymbolTable {
    match &cli.candwin_prog {
        Some(name) => SymbolTable::new().with(DEFAULT_PROGRAM_SYMBOL, name.clone()),
        None => SymbolTable::new(),
    }
}
