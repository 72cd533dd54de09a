//! Small synchronization helpers for the per-match worker threads

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// One-shot latch: starts closed, opens exactly once, never closes again.
///
/// Waiters block on a condition variable instead of spinning; `wait_timeout`
/// returns periodically so loops can re-check their liveness flag during
/// teardown.
#[derive(Debug, Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        if let Ok(mut open) = self.open.lock() {
            *open = true;
            self.cv.notify_all();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.lock().map(|open| *open).unwrap_or(false)
    }

    /// Block until the gate opens or the timeout elapses; returns whether it
    /// is open.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Ok(open) = self.open.lock() else {
            return false;
        };
        match self.cv.wait_timeout_while(open, timeout, |open| !*open) {
            Ok((open, _)) => *open,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_closed() {
        let gate = Gate::new();
        assert!(!gate.is_open());
        assert!(!gate.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn open_releases_waiters() {
        let gate = Arc::new(Gate::new());
        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || gate.wait_timeout(Duration::from_secs(5)))
        };
        gate.open();
        assert!(waiter.join().unwrap());
        assert!(gate.is_open());
    }

    #[test]
    fn stays_open() {
        let gate = Gate::new();
        gate.open();
        gate.open();
        assert!(gate.wait_timeout(Duration::from_millis(1)));
    }
}
