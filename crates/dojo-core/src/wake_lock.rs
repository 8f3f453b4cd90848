//! Screen wake-lock held for the whole session.

use crate::error::BackendError;

/// Renewal period used when the config does not override it.
pub const DEFAULT_RENEW_SECS: u64 = 30;

pub trait WakeLock {
    fn acquire(&mut self) -> Result<(), BackendError>;
    fn renew(&mut self) -> Result<(), BackendError>;
    fn release(&mut self) -> Result<(), BackendError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn renew(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Tracks whether the lock is held and logs backend failures.
pub struct WakeLockGuard<W> {
    lock: W,
    held: bool,
}

impl<W: WakeLock> WakeLockGuard<W> {
    pub fn new(lock: W) -> Self {
        Self { lock, held: false }
    }

    pub fn acquire(&mut self) {
        match self.lock.acquire() {
            Ok(()) => self.held = true,
            Err(e) => tracing::warn!(error = %e, "wake-lock acquire failed"),
        }
    }

    /// Renew while the session runs. A lock that failed to acquire is
    /// retried here.
    pub fn renew(&mut self) {
        let result = if self.held {
            self.lock.renew()
        } else {
            self.lock.acquire()
        };
        match result {
            Ok(()) => self.held = true,
            Err(e) => tracing::warn!(error = %e, "wake-lock renewal failed"),
        }
    }

    /// Release unconditionally.
    pub fn release(&mut self) {
        if let Err(e) = self.lock.release() {
            tracing::warn!(error = %e, "wake-lock release failed");
        }
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn lock(&self) -> &W {
        &self.lock
    }
}
