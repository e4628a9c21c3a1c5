//! Quiet-period debouncing for the editor preview.
//!
//! Each edit replaces the pending value and pushes the deadline back; the
//! value is released once no new edit has arrived for the whole quiet period.
//!
//! ```rust
//! use songbook::clock::ManualClock;
//! use songbook::debounce::Debouncer;
//! use std::rc::Rc;
//!
//! let clock = Rc::new(ManualClock::new());
//! let mut preview = Debouncer::new(Rc::clone(&clock));
//!
//! preview.push("{t: Dra");
//! clock.advance_ms(100);
//! preview.push("{t: Draft}");
//! clock.advance_ms(299);
//! assert_eq!(preview.poll(), None);
//! clock.advance_ms(1);
//! assert_eq!(preview.poll(), Some("{t: Draft}"));
//! ```

use crate::clock::Clock;
use std::time::Duration;

pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer<T, C: Clock> {
    clock: C,
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T, C: Clock> Debouncer<T, C> {
    pub fn new(clock: C) -> Self {
        Self::with_delay(clock, PREVIEW_DEBOUNCE)
    }

    pub fn with_delay(clock: C, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period
    pub fn push(&mut self, value: T) {
        let due = self.clock.now() + self.delay;
        self.pending = Some((value, due));
    }

    /// Take the pending value if its quiet period has elapsed
    pub fn poll(&mut self) -> Option<T> {
        let now = self.clock.now();
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value immediately, ignoring the deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(_, due)| *due)
    }
}
