//! Server-side state of the analysis page: gate, notifications, clipboard, sessions.

pub mod clipboard;
pub mod gate;
pub mod notify;
pub mod session;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session state stays usable even if a handler panicked while holding the lock.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
