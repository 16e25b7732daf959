//! Startup errors for the bridge host.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to setup signal handler: {0}")]
    SignalSetup(String),
    #[error("Failed to start input reader: {0}")]
    InputReader(String),
}

impl BridgeError {
    pub fn suggestion(&self) -> String {
        match self {
            BridgeError::SignalSetup(_) => {
                "Signal handler setup failed. Check system signal configuration.".to_string()
            }
            BridgeError::InputReader(_) => {
                "Thread creation failed. Check system thread limits (ulimit -u).".to_string()
            }
        }
    }
}
