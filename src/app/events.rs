//! Outbound simulator events and the per-tick snapshot.
//!
//! The [`Simulator`](super::service::Simulator) emits [`AppEvent`]s through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, append the permanent log to
//! a file, write telemetry to CSV, etc.

use serde::Serialize;

use crate::alerts::{AlertRecord, LogEntry};
use crate::engine::{EngineReadout, FuelState, ThrustAdjustment};
use crate::fault::Severity;
use crate::fsm::Phase;

/// Structured events emitted by the simulator core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AppEvent {
    /// The simulator has started (carries initial phase).
    Started(Phase),

    /// The phase changed, by command, forcing fault or the dynamics.
    PhaseChanged { from: Phase, to: Phase },

    /// A line was appended to the permanent log.
    FaultLogged(LogEntry),

    /// Periodic telemetry record.
    Telemetry(TelemetryRecord),
}

/// One telemetry row, for offline analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub elapsed_ms: u64,
    pub left_n1: f64,
    pub right_n1: f64,
    pub left_temperature: f64,
    pub right_temperature: f64,
    pub left_fuel_flow: f64,
    pub right_fuel_flow: f64,
    pub fuel_remaining: f64,
}

impl TelemetryRecord {
    /// CSV header matching [`TelemetryRecord::csv_row`].
    pub const CSV_HEADER: &'static str =
        "Time(ms),N1_left,N1_right,T_left,T_right,FF_left,FF_right,Fuel";

    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.elapsed_ms,
            self.left_n1,
            self.right_n1,
            self.left_temperature,
            self.right_temperature,
            self.left_fuel_flow,
            self.right_fuel_flow,
            self.fuel_remaining
        )
    }
}

/// Everything a presentation layer needs to render one frame.
///
/// Engine values are display-clamped; the simulation keeps the raw values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub elapsed_ms: u64,
    pub phase: Phase,
    pub left: EngineReadout,
    pub right: EngineReadout,
    pub fuel: FuelState,
    pub thrust: ThrustAdjustment,
    /// Live alerts, oldest first.
    pub live_alerts: Vec<AlertRecord>,
    /// Highest severity among `live_alerts`; drives the master caution /
    /// warning annunciator.
    pub worst_severity: Option<Severity>,
    pub start_light_on: bool,
    pub run_light_on: bool,
}
