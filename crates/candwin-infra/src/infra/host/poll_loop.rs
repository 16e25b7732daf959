use std::collections::HashMap;
use std::io;
use std::os::fd::RawFd;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::common::mutex_lock_or_recover;
use crate::usecases::ports::NotifierError;
use crate::usecases::ports::Readiness;
use crate::usecases::ports::ReadinessNotifier;
use crate::usecases::ports::WatchCallback;

struct Watch {
    readiness: Readiness,
    callback: WatchCallback,
}

/// Single threaded `poll(2)` loop.
///
/// Callbacks run on the thread calling [`PollLoop::run_once`] with the watch
/// table locked, so they must not register or unregister descriptors.
#[derive(Default)]
pub struct PollLoop {
    watches: Mutex<HashMap<RawFd, Watch>>,
}

impl PollLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watched(&self) -> Vec<RawFd> {
        let mut fds: Vec<RawFd> = mutex_lock_or_recover(&self.watches).keys().copied().collect();
        fds.sort_unstable();
        fds
    }

    pub fn is_watching(&self, fd: RawFd) -> bool {
        mutex_lock_or_recover(&self.watches).contains_key(&fd)
    }

    /// Waits up to `timeout` for readiness and dispatches callbacks.
    ///
    /// Returns the number of callbacks run. An interrupted wait counts as
    /// zero.
    pub fn run_once(&self, timeout: Duration) -> Result<usize, NotifierError> {
        let mut pollfds: Vec<libc::pollfd> = mutex_lock_or_recover(&self.watches)
            .iter()
            .map(|(fd, watch)| libc::pollfd {
                fd: *fd,
                events: poll_events(watch.readiness),
                revents: 0,
            })
            .collect();

        if pollfds.is_empty() {
            thread::sleep(timeout);
            return Ok(0);
        }

        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        // SAFETY: pollfds is a live, correctly sized array of pollfd structs.
        let result = unsafe {
            libc::poll(
                pollfds.as_mut_ptr(),
                pollfds.len() as libc::nfds_t,
                timeout_ms,
            )
        };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(NotifierError::Poll(err.to_string()));
        }
        if result == 0 {
            return Ok(0);
        }

        let mut dispatched = 0;
        let mut watches = mutex_lock_or_recover(&self.watches);
        for pollfd in pollfds.iter().filter(|p| p.revents != 0) {
            if pollfd.revents & libc::POLLNVAL != 0 {
                warn!(fd = pollfd.fd, "Watched descriptor is no longer valid; dropping watch");
                watches.remove(&pollfd.fd);
                continue;
            }

            // Unregistered between the snapshot and now.
            let Some(watch) = watches.get_mut(&pollfd.fd) else {
                continue;
            };
            trace!(fd = pollfd.fd, revents = pollfd.revents, "Descriptor ready");
            (watch.callback)(pollfd.fd, watch.readiness);
            dispatched += 1;
        }

        Ok(dispatched)
    }
}

fn poll_events(readiness: Readiness) -> libc::c_short {
    match readiness {
        Readiness::Readable => libc::POLLIN,
    }
}

impl ReadinessNotifier for PollLoop {
    fn register(
        &self,
        fd: RawFd,
        readiness: Readiness,
        callback: WatchCallback,
    ) -> Result<(), NotifierError> {
        if fd < 0 {
            return Err(NotifierError::InvalidDescriptor(fd));
        }

        let mut watches = mutex_lock_or_recover(&self.watches);
        if watches.contains_key(&fd) {
            return Err(NotifierError::AlreadyWatched(fd));
        }
        watches.insert(
            fd,
            Watch {
                readiness,
                callback,
            },
        );
        debug!(fd, readiness = ?readiness, "Watching descriptor");
        Ok(())
    }

    fn unregister(&self, fd: RawFd) {
        if mutex_lock_or_recover(&self.watches).remove(&fd).is_some() {
            debug!(fd, "Stopped watching descriptor");
        }
    }
}
