use std::cell::Cell as StdCell;
use std::time::{Duration, Instant};

/// Monotonic time source. `now` is measured from an arbitrary epoch.
pub trait Clock {
    fn now(&self) -> Duration;

    fn elapsed_since(&self, earlier: Duration) -> Duration {
        self.now().saturating_sub(earlier)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
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
        self.epoch.elapsed()
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: StdCell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Fixed-step pacing driven by frame callbacks.
///
/// At most one tick is released per [`TickPacer::poll`]. The anchor advances
/// by exactly one interval per tick, so late frames carry their remainder
/// and the tick grid does not drift with frame timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickPacer {
    anchor: Duration,
}

impl TickPacer {
    pub fn new(now: Duration) -> Self {
        Self { anchor: now }
    }

    pub fn anchor(&self) -> Duration {
        self.anchor
    }

    /// Re-seats the anchor, e.g. on start or resume.
    pub fn reset(&mut self, now: Duration) {
        self.anchor = now;
    }

    /// Returns true if a tick is due at `now`, advancing the anchor if so.
    pub fn poll(&mut self, now: Duration, interval: Duration) -> bool {
        let elapsed = now.saturating_sub(self.anchor);
        if interval.is_zero() || elapsed < interval {
            return false;
        }
        self.anchor += interval;
        true
    }
}
