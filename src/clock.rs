//! Session time sources.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time elapsed since the session started.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Monotonic clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }
}

impl Clock for SessionClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same reading, so a
/// replay driver can hold one handle while the scanner holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Set the reading in seconds. Negative and NaN readings become zero;
    /// readings past `Duration::MAX` saturate.
    pub fn set_secs(&self, secs: f64) {
        let now = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
