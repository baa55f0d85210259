//! Manual-reset latch.
//!
//! Unlike a counting semaphore or an auto-reset event, a [`Signal`]
//! stays set until somebody explicitly resets it. A single
//! [`signal`](Signal::signal) therefore releases every waiter, present
//! or future, which makes signal-before-wait a safe ordering.

use std::{
    sync::{Condvar, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// A manual-reset latch.
///
/// The latch is a single boolean guarded by a mutex, paired with a
/// condition variable. Setting the latch broadcasts to all waiters;
/// waking does *not* consume the signal.
///
/// Once set, the latch stays set until [`reset`](Signal::reset); it is
/// not a counter.
#[derive(Debug, Default)]
pub struct Signal {
    signaled: Mutex<bool>,
    cond: Condvar,
}

impl Signal {
    /// Creates a new latch in the unsignaled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the latch and wakes every waiter.
    ///
    /// After this call returns, any [`wait`](Signal::wait) without an
    /// intervening [`reset`](Signal::reset) returns immediately.
    /// Signaling an already-set latch is indistinguishable from a
    /// single signal.
    pub fn signal(&self) {
        let mut signaled = self.lock();
        *signaled = true;
        self.cond.notify_all();
    }

    /// Clears the latch. Wakes no one.
    pub fn reset(&self) {
        *self.lock() = false;
    }

    /// Blocks until the latch is set.
    ///
    /// Returns immediately if the latch is already set. The signal is
    /// not consumed: concurrent waiters released by one
    /// [`signal`](Signal::signal) all observe the latch set.
    pub fn wait(&self) {
        let mut signaled = self.lock();
        while !*signaled {
            signaled = self
                .cond
                .wait(signaled)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Blocks until the latch is set, giving up after `timeout`.
    ///
    /// Returns whether the latch was observed set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut signaled = self.lock();
        while !*signaled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let (guard, result) = self
                .cond
                .wait_timeout(signaled, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            signaled = guard;
            if result.timed_out() {
                return *signaled;
            }
        }
        true
    }

    /// Returns whether the latch is currently set.
    pub fn is_signaled(&self) -> bool {
        *self.lock()
    }

    // The guarded state is a lone boolean, valid regardless of where a
    // panicking holder left off.
    fn lock(&self) -> std::sync::MutexGuard<'_, bool> {
        self.signaled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
