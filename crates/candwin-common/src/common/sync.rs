use std::sync::Mutex;
use std::sync::MutexGuard;

use tracing::warn;

/// Locks `lock`, taking the inner value back if a previous holder panicked.
///
/// The notifier and the test doubles only keep plain collections behind
/// their mutexes, so a poisoned guard never leaves them half-updated.
pub fn mutex_lock_or_recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering from poisoned mutex");
        poisoned.into_inner()
    })
}
