//! Port traits: the hexagonal boundary between the simulator core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Simulator (domain)
//! ```

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry / display)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Collecting sink, handy for tests and batch runs.
impl EventSink for Vec<AppEvent> {
    fn emit(&mut self, event: &AppEvent) {
        self.push(event.clone());
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (tick source → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond time source that also paces the tick loop.
pub trait Clock {
    /// Current time in milliseconds (arbitrary epoch, monotonic).
    fn now_ms(&self) -> u64;

    /// Wait until one tick period after the previous tick.  A wall clock
    /// sleeps; a simulated clock simply advances.
    fn wait_tick(&mut self, period_ms: u64);
}
