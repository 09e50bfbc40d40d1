//! Cross-thread mutual exclusion for shared node state.
//!
//! All state shared between the network-receive path and application
//! threads sits behind [`Guarded`]. Acquisition is scoped: the guard
//! releases the lock when dropped, on every exit path including early
//! returns, so there is no manual release to forget.
//!
//! `Guarded` is not re-entrant. A thread that already holds a guard must
//! not acquire the same `Guarded` again; callers are responsible for
//! keeping critical sections free of re-entry (observer callbacks, for
//! example, run after the guard is dropped).

use parking_lot::{Mutex, MutexGuard};

/// Mutual exclusion wrapper around a piece of shared node state.
#[derive(Debug, Default)]
pub struct Guarded<T> {
    inner: Mutex<T>,
}

/// RAII guard for [`Guarded`]; the lock is held until this is dropped.
pub type StateGuard<'a, T> = MutexGuard<'a, T>;

impl<T> Guarded<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        Guarded {
            inner: Mutex::new(value),
        }
    }

    /// Acquire the lock, blocking until it is available.
    pub fn lock(&self) -> StateGuard<'_, T> {
        self.inner.lock()
    }

    /// Try to acquire the lock without blocking.
    ///
    /// Returns `None` if another thread holds it; the caller decides
    /// whether to retry or abandon the operation.
    pub fn try_lock(&self) -> Option<StateGuard<'_, T>> {
        self.inner.try_lock()
    }

    /// Consume the wrapper and return the inner value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}
