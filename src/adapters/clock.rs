//! Clock adapters.
//!
//! - [`SystemClock`] wraps `std::time::Instant` and sleeps between ticks,
//!   for real-time runs.
//! - [`ManualClock`] only moves when told to, for batch runs and tests.

use std::time::{Duration, Instant};

use crate::app::ports::Clock;

/// Wall-clock time since construction.
pub struct SystemClock {
    start: Instant,
    /// Deadline of the next tick, ms since `start`.
    next_tick_ms: u64,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            next_tick_ms: 0,
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Sleep until the next deadline.  Deadlines advance by a fixed period
    /// so a slow tick does not shift every later one.
    fn wait_tick(&mut self, period_ms: u64) {
        self.next_tick_ms += period_ms;
        let now = self.now_ms();
        if self.next_tick_ms > now {
            std::thread::sleep(Duration::from_millis(self.next_tick_ms - now));
        } else {
            // Overran: resynchronise instead of bursting to catch up.
            self.next_tick_ms = now;
        }
    }
}

/// Simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn wait_tick(&mut self, period_ms: u64) {
        self.advance(period_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_by_period() {
        let mut c = ManualClock::new(100);
        c.wait_tick(5);
        c.wait_tick(5);
        assert_eq!(c.now_ms(), 110);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut c = SystemClock::new();
        let a = c.now_ms();
        c.wait_tick(2);
        assert!(c.now_ms() >= a + 1);
    }
}
