//! Cross-thread suspend requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle used to ask a running engine to pause.
///
/// The request is observed at the next phase boundary. It is consumed when
/// observed, so one request pauses the engine once.
#[derive(Debug, Clone, Default)]
pub struct SuspendHandle {
    requested: Arc<AtomicBool>,
}

impl SuspendHandle {
    /// Create a handle with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the engine to pause after the phase it is currently running.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Withdraw a pending request.
    pub fn cancel(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }

    /// Whether a request is pending.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Consume a pending request, returning whether there was one.
    pub(crate) fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_consumed_once() {
        let handle = SuspendHandle::new();
        let remote = handle.clone();

        remote.request();
        assert!(handle.is_requested());
        assert!(handle.take());
        assert!(!handle.take());
    }

    #[test]
    fn request_crosses_threads() {
        let handle = SuspendHandle::new();
        let remote = handle.clone();
        std::thread::spawn(move || remote.request()).join().unwrap();
        assert!(handle.is_requested());

        handle.cancel();
        assert!(!handle.is_requested());
    }
}
