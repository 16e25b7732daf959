//! Host event loop readiness port.

use std::os::fd::RawFd;
use std::sync::Arc;

use super::errors::NotifierError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readiness {
    Readable,
}

/// Invoked from the host loop when a watched descriptor is ready.
///
/// Callbacks must not call back into the notifier.
pub type WatchCallback = Box<dyn FnMut(RawFd, Readiness) + Send>;

pub trait ReadinessNotifier: Send + Sync {
    fn register(
        &self,
        fd: RawFd,
        readiness: Readiness,
        callback: WatchCallback,
    ) -> Result<(), NotifierError>;

    /// Unknown descriptors are ignored.
    fn unregister(&self, fd: RawFd);
}

pub type NotifierHandle = Arc<dyn ReadinessNotifier>;
