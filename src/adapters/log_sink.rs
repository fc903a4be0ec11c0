//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every simulator event to the `log`
//! facade.  The runner installs a subscriber that prints these; a GUI or
//! file-writing adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fault::Severity;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Clone, Copy)]
pub struct LogEventSink {
    telemetry: bool,
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self { telemetry: true }
    }

    /// Telemetry is one line per tick; let callers turn it off.
    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.telemetry = enabled;
        self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                if self.telemetry {
                    info!(
                        "TELEM | t={}ms | N1={:.2}/{:.2}% | EGT={:.1}/{:.1}\u{00b0}C | \
                         FF={:.2}/{:.2} | fuel={:.1}",
                        t.elapsed_ms,
                        t.left_n1,
                        t.right_n1,
                        t.left_temperature,
                        t.right_temperature,
                        t.left_fuel_flow,
                        t.right_fuel_flow,
                        t.fuel_remaining,
                    );
                }
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::FaultLogged(entry) => match entry.kind.severity() {
                Severity::Warning => warn!("FAULT | {}", entry),
                Severity::Caution | Severity::Informational => info!("FAULT | {}", entry),
            },
            AppEvent::Started(phase) => {
                info!("START | initial_phase={}", phase);
            }
        }
    }
}
