#![deny(clippy::all)]
//! Real adapters behind the use case ports.

mod config;
mod error;
pub mod host;
pub mod process;
mod signal_handler;
mod symbol_table;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use host::PollLoop;
pub use process::ProcessLauncher;
pub use process::set_non_blocking;
pub use signal_handler::SignalHandler;
pub use symbol_table::SymbolTable;
