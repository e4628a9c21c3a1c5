//! # Auto-Scroll Engine
//!
//! Advances a scroll container at a steady speed while a performer plays.
//!
//! ## States
//! ```text
//!            start                      wheel / touch-move
//! Stopped ─────────▶ Scrolling ─────────────────────────▶ Paused
//!    ▲                 │    ▲                               │
//!    │ stop / bottom   │    └────── 1000 ms, no new input ──┘
//!    └─────────────────┘                 (stop cancels)
//! ```
//!
//! - Every 50 ms tick moves `scroll_top` down by `speed` pixels.
//! - A tick that finds the container within 10 px of the bottom stops.
//! - `start` from the bottom jumps back to the top first.
//! - Manual scrolling more than 100 ms after the previous detected manual
//!   scroll pauses ticking and schedules a resume 1000 ms later. Manual
//!   events inside that 100 ms window are ignored.
//!
//! ## Timers
//! The engine owns its timers as deadlines inside [`Phase`]: `Scrolling`
//! carries the next tick, `Paused` carries the resume time, `Stopped` carries
//! nothing. There is never a tick timer and a resume timer at the same time,
//! and `stop` (or dropping the engine) cancels whichever exists. The host
//! drives the engine by calling [`AutoScroll::poll`], which fires everything
//! that is due according to the engine's [`Clock`].
//!
//! ## Container lifetime
//! The engine holds its container weakly. Once the container is dropped,
//! ticks and starts are no-ops.
//!
//! ## Example
//! ```rust
//! use songbook::autoscroll::{AutoScroll, Viewport};
//! use songbook::clock::ManualClock;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let clock = Rc::new(ManualClock::new());
//! let viewport = Rc::new(RefCell::new(Viewport::new(1000.0, 100.0)));
//! let mut scroll = AutoScroll::new(&viewport, Rc::clone(&clock), 1.0);
//!
//! scroll.start();
//! clock.advance_ms(500);
//! scroll.poll();
//! assert_eq!(viewport.borrow().scroll_top, 10.0);
//! ```

use crate::clock::Clock;
use crate::settings::{clamp_scroll_speed, SCROLL_SPEED_STEP};
use log::{debug, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const BOTTOM_THRESHOLD_PX: f64 = 10.0;
pub const MANUAL_SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);
pub const RESUME_DELAY: Duration = Duration::from_millis(1000);

/// A scrollable element
pub trait ScrollContainer {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, top: f64);
    fn scroll_height(&self) -> f64;
    fn client_height(&self) -> f64;

    fn is_at_bottom(&self) -> bool {
        self.scroll_top() + self.client_height() >= self.scroll_height() - BOTTOM_THRESHOLD_PX
    }
}

/// Plain scroll metrics, used when the real element lives elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl Viewport {
    pub fn new(scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            scroll_height,
            client_height,
        }
    }
}

impl ScrollContainer for Viewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: f64) {
        // Browsers clamp scrollTop to the scrollable range
        let max = (self.scroll_height - self.client_height).max(0.0);
        self.scroll_top = top.clamp(0.0, max);
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }
}

/// Where the engine is, with the one deadline that phase owns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Stopped,
    Scrolling { next_tick: Duration },
    Paused { resume_at: Duration },
}

/// Snapshot of the engine's state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    /// True while scrolling or paused by a manual scroll
    pub is_scrolling: bool,
    pub speed: f64,
    pub last_manual_scroll: Option<Duration>,
}

pub struct AutoScroll<S: ScrollContainer, C: Clock> {
    container: Weak<RefCell<S>>,
    clock: C,
    phase: Phase,
    speed: f64,
    last_manual_scroll: Option<Duration>,
}

impl<S: ScrollContainer, C: Clock> AutoScroll<S, C> {
    /// Bind a new, stopped engine to a container
    pub fn new(container: &Rc<RefCell<S>>, clock: C, speed: f64) -> Self {
        Self {
            container: Rc::downgrade(container),
            clock,
            phase: Phase::Stopped,
            speed: clamp_scroll_speed(speed),
            last_manual_scroll: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// True while scrolling or paused by a manual scroll
    pub fn is_scrolling(&self) -> bool {
        !matches!(self.phase, Phase::Stopped)
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            is_scrolling: self.is_scrolling(),
            speed: self.speed,
            last_manual_scroll: self.last_manual_scroll,
        }
    }

    /// The time of the next tick or resume, if any is scheduled
    pub fn next_deadline(&self) -> Option<Duration> {
        match self.phase {
            Phase::Stopped => None,
            Phase::Scrolling { next_tick } => Some(next_tick),
            Phase::Paused { resume_at } => Some(resume_at),
        }
    }

    /// Start scrolling, jumping to the top first if already at the bottom
    pub fn start(&mut self) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        {
            let mut container = container.borrow_mut();
            if container.is_at_bottom() {
                container.set_scroll_top(0.0);
            }
        }
        let now = self.clock.now();
        self.phase = Phase::Scrolling {
            next_tick: now + TICK_INTERVAL,
        };
        debug!("auto-scroll started at speed {}", self.speed);
    }

    /// Stop scrolling and cancel any pending tick or resume
    pub fn stop(&mut self) {
        if self.phase != Phase::Stopped {
            debug!("auto-scroll stopped");
        }
        self.phase = Phase::Stopped;
    }

    pub fn toggle(&mut self) {
        match self.phase {
            Phase::Scrolling { .. } => self.stop(),
            Phase::Stopped | Phase::Paused { .. } => self.start(),
        }
    }

    /// Run one tick: stop at the bottom, otherwise move down by `speed`
    pub fn tick(&mut self) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        let mut container = container.borrow_mut();
        if container.is_at_bottom() {
            drop(container);
            debug!("auto-scroll reached the end");
            self.stop();
            return;
        }
        let top = container.scroll_top() + self.speed;
        container.set_scroll_top(top);
        trace!("auto-scroll tick to {}", top);
    }

    /// Fire every tick or resume that is due at the clock's current time
    pub fn poll(&mut self) {
        let now = self.clock.now();
        loop {
            match self.phase {
                Phase::Scrolling { next_tick } if next_tick <= now => {
                    self.phase = Phase::Scrolling {
                        next_tick: next_tick + TICK_INTERVAL,
                    };
                    self.tick();
                }
                Phase::Paused { resume_at } if resume_at <= now => {
                    debug!("auto-scroll resuming after manual scroll");
                    self.phase = Phase::Scrolling {
                        next_tick: resume_at + TICK_INTERVAL,
                    };
                }
                _ => break,
            }
        }
    }

    /// Report a wheel or touch-move event on the container
    pub fn manual_scroll(&mut self) {
        if !self.is_scrolling() {
            return;
        }
        let now = self.clock.now();
        let debounced = self
            .last_manual_scroll
            .is_some_and(|last| now.saturating_sub(last) <= MANUAL_SCROLL_DEBOUNCE);
        if debounced {
            return;
        }
        self.last_manual_scroll = Some(now);
        self.phase = Phase::Paused {
            resume_at: now + RESUME_DELAY,
        };
        debug!("auto-scroll paused by manual scroll");
    }

    pub fn increase_speed(&mut self) -> f64 {
        self.set_speed(self.speed + SCROLL_SPEED_STEP)
    }

    pub fn decrease_speed(&mut self) -> f64 {
        self.set_speed(self.speed - SCROLL_SPEED_STEP)
    }

    /// Set the speed, clamped to the allowed range. Takes effect on the next tick.
    /// NaN leaves the speed unchanged.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        if speed.is_nan() {
            return self.speed;
        }
        self.speed = clamp_scroll_speed(speed);
        self.speed
    }
}

impl<S: ScrollContainer, C: Clock> Drop for AutoScroll<S, C> {
    fn drop(&mut self) {
        self.stop();
    }
}
