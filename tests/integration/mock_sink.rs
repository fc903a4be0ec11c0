//! Recording event sink for integration tests.
//!
//! Keeps every event so tests can assert on the full history: phase
//! changes, permanent log lines and telemetry.

use turbine_sim::alerts::LogEntry;
use turbine_sim::app::events::{AppEvent, TelemetryRecord};
use turbine_sim::app::ports::EventSink;
use turbine_sim::fault::FaultKind;
use turbine_sim::fsm::Phase;

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target phases of every transition, in order.
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn log_lines(&self) -> Vec<&LogEntry> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::FaultLogged(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn logged(&self, kind: FaultKind) -> usize {
        self.log_lines().iter().filter(|l| l.kind == kind).count()
    }

    pub fn telemetry(&self) -> Vec<TelemetryRecord> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Telemetry(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
