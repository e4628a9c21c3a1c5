//! Time sources for the timed parts of the crate.
//!
//! [`AutoScroll`](crate::autoscroll::AutoScroll) and
//! [`Debouncer`](crate::debounce::Debouncer) never read the system time
//! directly; they ask a [`Clock`] for the time elapsed since some fixed origin.
//! Hosts use [`SystemClock`]; tests and the wasm bindings use
//! [`ManualClock`] and move it forward explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, to: Duration) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_moves_forward_only() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance_ms(50);
        clock.set(Duration::from_millis(20));
        assert_eq!(clock.now(), Duration::from_millis(50));
        clock.set(Duration::from_millis(80));
        assert_eq!(clock.now(), Duration::from_millis(80));
    }

    #[test]
    fn test_shared_manual_clock() {
        let clock = Rc::new(ManualClock::new());
        let shared = Rc::clone(&clock);
        clock.advance_ms(10);
        assert_eq!(shared.now(), Duration::from_millis(10));
    }
}
