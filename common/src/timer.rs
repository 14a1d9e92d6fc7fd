//! Time as seen by the client core.
//!
//! The poller sleeps between status fetches and the query cache ages entries;
//! both go through `Timer` so the browser can back it with `setTimeout` while
//! tests use `ManualTimer`, which fast-forwards virtual time instead of
//! waiting on the wall clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[allow(async_fn_in_trait)]
pub trait Timer {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}

/// Deterministic timer: `sleep` returns immediately after advancing the
/// virtual clock by the requested amount.
///
/// Clones share the same clock, so a test can keep a handle while the client
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Rc<ManualTimerState>,
}

#[derive(Debug, Default)]
struct ManualTimerState {
    now: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.state.now.set(self.state.now.get() + by);
    }

    /// Every delay requested through `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.sleeps.borrow().clone()
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> Duration {
        self.state.now.get()
    }

    async fn sleep(&self, duration: Duration) {
        self.state.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

/// Cooperative cancellation flag shared between a polling loop and the view
/// that owns it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_sleep_advances_shared_clock() {
        let timer = ManualTimer::new();
        let handle = timer.clone();
        futures::executor::block_on(timer.sleep(Duration::from_millis(2000)));
        futures::executor::block_on(timer.sleep(Duration::from_millis(500)));

        assert_eq!(handle.now(), Duration::from_millis(2500));
        assert_eq!(
            handle.sleeps(),
            vec![Duration::from_millis(2000), Duration::from_millis(500)]
        );
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let view_side = token.clone();
        assert!(!token.is_cancelled());
        view_side.cancel();
        assert!(token.is_cancelled());
    }
}
