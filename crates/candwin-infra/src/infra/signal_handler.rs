//! Host shutdown on SIGINT/SIGTERM.

use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;
use signal_hook::iterator::Signals;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use tracing::info;

use crate::infra::error::BridgeError;

pub struct SignalHandler {
    _handle: JoinHandle<()>,
}

impl SignalHandler {
    /// Sets `shutdown` when SIGINT or SIGTERM arrives.
    pub fn setup(shutdown: Arc<AtomicBool>) -> Result<Self, BridgeError> {
        let mut signals =
            Signals::new([SIGINT, SIGTERM]).map_err(|e| BridgeError::SignalSetup(e.to_string()))?;

        let handle = thread::Builder::new()
            .name("signal-handler".to_string())
            .spawn(move || {
                for sig in signals.forever() {
                    info!(signal = sig, "Received signal, shutting down bridge host");
                    shutdown.store(true, Ordering::SeqCst);
                }
            })
            .map_err(|e| {
                BridgeError::SignalSetup(format!("failed to spawn signal handler: {}", e))
            })?;

        Ok(Self { _handle: handle })
    }
}
