// src/utils/clock.rs
use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond clock. Time-driven state never reads wall time on
/// its own; callers pass `now_ms()` in explicitly.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for previews and tests.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        ManualClock { now: Cell::new(start_ms) }
    }

    pub fn set(&self, ms: u64) {
        // Monotonic: never step backwards.
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }

    pub fn advance(&self, dt_ms: u64) -> u64 {
        let t = self.now.get().saturating_add(dt_ms);
        self.now.set(t);
        t
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 { self.now.get() }
}
