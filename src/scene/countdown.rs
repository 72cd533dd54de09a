//! One-shot countdown timer on its own thread
//!
//! Decrements once per period, reports each new value through `on_tick`, and
//! invokes `on_zero` exactly once when it reaches zero. Cancellation wakes
//! the timer thread immediately - a torn-down match never waits out a
//! pending second.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Default)]
struct TimerShared {
    cancelled: Mutex<bool>,
    cv: Condvar,
}

pub struct Countdown {
    shared: Arc<TimerShared>,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Start counting down from `seconds`, one decrement per `period`.
    pub fn start(
        seconds: u32,
        period: Duration,
        on_tick: impl Fn(u32) + Send + 'static,
        on_zero: impl FnOnce() + Send + 'static,
    ) -> Self {
        let shared = Arc::new(TimerShared::default());
        let timer = shared.clone();

        let handle = thread::spawn(move || {
            let mut remaining = seconds;
            let Ok(mut cancelled) = timer.cancelled.lock() else {
                return;
            };
            while remaining > 0 {
                let result = timer
                    .cv
                    .wait_timeout_while(cancelled, period, |cancelled| !*cancelled);
                let Ok((guard, timeout)) = result else {
                    return;
                };
                cancelled = guard;
                if *cancelled {
                    return;
                }
                if timeout.timed_out() {
                    remaining -= 1;
                    on_tick(remaining);
                }
            }
            drop(cancelled);
            on_zero();
        });

        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Interrupt the timer; `on_zero` will never fire after this returns.
    pub fn cancel(&mut self) {
        if let Ok(mut cancelled) = self.shared.cancelled.lock() {
            *cancelled = true;
        }
        self.shared.cv.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
