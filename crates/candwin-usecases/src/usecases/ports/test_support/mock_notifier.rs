//! Mock host readiness notifier.

use std::collections::HashMap;
use std::os::fd::RawFd;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::usecases::ports::NotifierError;
use crate::usecases::ports::Readiness;
use crate::usecases::ports::ReadinessNotifier;
use crate::usecases::ports::WatchCallback;

#[derive(Default)]
pub struct MockNotifier {
    watches: Mutex<HashMap<RawFd, (Readiness, WatchCallback)>>,
    registered: Mutex<Vec<RawFd>>,
    unregistered: Mutex<Vec<RawFd>>,
    fail_registration: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail_registration.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn is_watching(&self, fd: RawFd) -> bool {
        self.watches.lock().unwrap().contains_key(&fd)
    }

    pub fn watch_count(&self) -> usize {
        self.watches.lock().unwrap().len()
    }

    pub fn registered(&self) -> Vec<RawFd> {
        self.registered.lock().unwrap().clone()
    }

    pub fn unregistered(&self) -> Vec<RawFd> {
        self.unregistered.lock().unwrap().clone()
    }

    /// Runs the callback for `fd` as the host loop would. Returns false when
    /// nothing is watching `fd`.
    pub fn fire(&self, fd: RawFd) -> bool {
        let mut watches = self.watches.lock().unwrap();
        match watches.get_mut(&fd) {
            Some((readiness, callback)) => {
                callback(fd, *readiness);
                true
            }
            None => false,
        }
    }
}

impl ReadinessNotifier for MockNotifier {
    fn register(
        &self,
        fd: RawFd,
        readiness: Readiness,
        callback: WatchCallback,
    ) -> Result<(), NotifierError> {
        if self.fail_registration.load(Ordering::SeqCst) {
            return Err(NotifierError::Poll("mock registration failure".to_string()));
        }
        let mut watches = self.watches.lock().unwrap();
        if watches.contains_key(&fd) {
            return Err(NotifierError::AlreadyWatched(fd));
        }
        watches.insert(fd, (readiness, callback));
        self.registered.lock().unwrap().push(fd);
        Ok(())
    }

    fn unregister(&self, fd: RawFd) {
        if self.watches.lock().unwrap().remove(&fd).is_some() {
            self.unregistered.lock().unwrap().push(fd);
        }
    }
}
