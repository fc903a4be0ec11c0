//! Fault detector.
//!
//! Runs **every tick before the dynamics**.  Each check reads the engine
//! and fuel state and yields at most one [`FaultKind`]; a forcing kind
//! also yields a shutdown request.  Checks run in a fixed order:
//!
//! ```text
//!  fuel ─▶ fuel flow ─▶ N1 left ─▶ N1 right ─▶ EGT left ─▶ EGT right
//!       ─▶ all N1 ─▶ all EGT
//! ```
//!
//! Within a family a sensor loss suppresses the value thresholds (no
//! over-speed is reported from a dead N1 indication).  A shutdown request
//! becomes the phase seen by the remaining checks of the same tick, so an
//! over-temperature limit that only applies while RUNNING is not reported
//! once an earlier check has already shut the engines down.
//!
//! The check functions are pure.  [`FaultDetector`] only remembers which
//! kinds were present last tick so it can log onset and clearance edges.

use heapless::Vec;
use log::{debug, warn};

use crate::engine::{EnginePair, EngineReadout, FuelState};
use crate::fault::{FaultKind, FaultMask};
use crate::fsm::Phase;
use crate::fsm::context::SimContext;

/// Fuel quantity below which LOW_FUEL fires.
pub const LOW_FUEL_LIMIT: f64 = 1000.0;
/// Fuel flow above which OVER_FUEL_FLOW fires.
pub const FUEL_FLOW_LIMIT: f64 = 50.0;
pub const OVER_SPEED_CAUTION: f64 = 105.0;
pub const OVER_SPEED_WARNING: f64 = 120.0;
pub const START_EGT_CAUTION: f64 = 850.0;
pub const START_EGT_WARNING: f64 = 1000.0;
pub const RUN_EGT_CAUTION: f64 = 950.0;
pub const RUN_EGT_WARNING: f64 = 1100.0;
/// Left N1 at or below which a total sensor loss goes straight to OFF.
pub const DECAYED_N1: f64 = 1.0;

/// Checks run by [`detect`], in order.  Each yields at most one finding.
pub const CHECK_COUNT: usize = 8;

/// Upper bound on findings per tick.
pub const MAX_FINDINGS: usize = CHECK_COUNT;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One check's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    pub kind: FaultKind,
    /// Phase this finding forces, if any.
    pub shutdown: Option<Phase>,
}

impl Finding {
    fn caution(kind: FaultKind) -> Self {
        Self {
            kind,
            shutdown: None,
        }
    }
}

/// Everything detected in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Detected kinds in check order.  A kind reported by both engines'
    /// checks appears once.
    pub faults: Vec<FaultKind, MAX_FINDINGS>,
    /// Final phase requested by the forcing findings, if any.
    pub shutdown: Option<Phase>,
}

impl Detection {
    pub fn contains(&self, kind: FaultKind) -> bool {
        self.faults.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    fn record(&mut self, finding: Option<Finding>, phase: &mut Phase) {
        let Some(f) = finding else { return };
        if !self.faults.contains(&f.kind) {
            let pushed = self.faults.push(f.kind).is_ok();
            debug_assert!(pushed, "more findings than checks");
        }
        if let Some(next) = f.shutdown {
            if next != *phase {
                *phase = next;
                self.shutdown = Some(next);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Protective shutdown target for a forcing fault in `phase`.
fn protective_stop(phase: Phase) -> Option<Phase> {
    phase.is_powered().then_some(Phase::Stopping)
}

/// Fuel quantity.  Running dry while powered forces STOPPING.
pub fn check_fuel(fuel: &FuelState, phase: Phase) -> Option<Finding> {
    if fuel.sensor_failed {
        return Some(Finding::caution(FaultKind::FuelSensorFail));
    }
    if fuel.remaining < LOW_FUEL_LIMIT && phase.is_powered() {
        let shutdown = if fuel.remaining <= 0.0 {
            protective_stop(phase)
        } else {
            None
        };
        return Some(Finding {
            kind: FaultKind::LowFuel,
            shutdown,
        });
    }
    None
}

/// Either engine's fuel flow over the limit.  Caution only.
pub fn check_fuel_flow(engines: &EnginePair) -> Option<Finding> {
    (engines.left.fuel_flow > FUEL_FLOW_LIMIT || engines.right.fuel_flow > FUEL_FLOW_LIMIT)
        .then(|| Finding::caution(FaultKind::OverFuelFlow))
}

/// One engine's N1 channels, then its speed limits.
pub fn check_n1(engine: &EngineReadout, phase: Phase) -> Option<Finding> {
    let sensors = engine.sensor_faults;
    if sensors.n1_total() {
        return Some(Finding::caution(FaultKind::SingleEngineN1TotalFail));
    }
    if sensors.n1_any() {
        return Some(Finding::caution(FaultKind::SingleN1SensorFail));
    }
    if engine.n1 > OVER_SPEED_WARNING {
        return Some(Finding {
            kind: FaultKind::OverSpeed2,
            shutdown: protective_stop(phase),
        });
    }
    if engine.n1 > OVER_SPEED_CAUTION {
        return Some(Finding::caution(FaultKind::OverSpeed1));
    }
    None
}

/// One engine's EGT channels, then the phase-dependent temperature limits.
pub fn check_egt(engine: &EngineReadout, phase: Phase) -> Option<Finding> {
    let sensors = engine.sensor_faults;
    if sensors.egt_total() {
        return Some(Finding::caution(FaultKind::SingleEngineEgtTotalFail));
    }
    if sensors.egt_any() {
        return Some(Finding::caution(FaultKind::SingleEgtSensorFail));
    }
    let (caution, warning, caution_limit, warning_limit) = match phase {
        Phase::Starting => (
            FaultKind::OverTemp1,
            FaultKind::OverTemp2,
            START_EGT_CAUTION,
            START_EGT_WARNING,
        ),
        Phase::Running => (
            FaultKind::OverTemp3,
            FaultKind::OverTemp4,
            RUN_EGT_CAUTION,
            RUN_EGT_WARNING,
        ),
        Phase::Off | Phase::Stopping => return None,
    };
    if engine.temperature > warning_limit {
        return Some(Finding {
            kind: warning,
            shutdown: protective_stop(phase),
        });
    }
    if engine.temperature > caution_limit {
        return Some(Finding::caution(caution));
    }
    None
}

/// Shutdown target when an entire indication family is lost: straight to
/// OFF once the left engine has spun down, otherwise STOPPING.
fn total_loss_shutdown(engines: &EnginePair, phase: Phase) -> Option<Phase> {
    if phase != Phase::Off && engines.left.n1 <= DECAYED_N1 {
        Some(Phase::Off)
    } else {
        protective_stop(phase)
    }
}

/// All four N1 channels lost.
pub fn check_all_n1(engines: &EnginePair, phase: Phase) -> Option<Finding> {
    (engines.left.sensor_faults.n1_total() && engines.right.sensor_faults.n1_total()).then(|| {
        Finding {
            kind: FaultKind::AllN1SensorsFail,
            shutdown: total_loss_shutdown(engines, phase),
        }
    })
}

/// All four EGT channels lost.
pub fn check_all_egt(engines: &EnginePair, phase: Phase) -> Option<Finding> {
    (engines.left.sensor_faults.egt_total() && engines.right.sensor_faults.egt_total()).then(|| {
        Finding {
            kind: FaultKind::AllEgtSensorsFail,
            shutdown: total_loss_shutdown(engines, phase),
        }
    })
}

/// Run every check in order against one state, threading the phase.
pub fn detect(engines: &EnginePair, fuel: &FuelState, phase: Phase) -> Detection {
    let mut out = Detection::default();
    let mut phase = phase;

    out.record(check_fuel(fuel, phase), &mut phase);
    out.record(check_fuel_flow(engines), &mut phase);
    out.record(check_n1(&engines.left, phase), &mut phase);
    out.record(check_n1(&engines.right, phase), &mut phase);
    out.record(check_egt(&engines.left, phase), &mut phase);
    out.record(check_egt(&engines.right, phase), &mut phase);
    out.record(check_all_n1(engines, phase), &mut phase);
    out.record(check_all_egt(engines, phase), &mut phase);

    out
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Stateful wrapper that logs fault onset and clearance.
#[derive(Debug, Default)]
pub struct FaultDetector {
    /// Kinds present on the previous tick.
    present: FaultMask,
}

impl FaultDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate all checks against the context.
    pub fn evaluate(&mut self, ctx: &SimContext) -> Detection {
        let detection = detect(&ctx.engines, &ctx.fuel, ctx.phase);

        let mut now = FaultMask::EMPTY;
        for &kind in &detection.faults {
            now.insert(kind);
            if !self.present.contains(kind) {
                debug!("fault onset: {} ({:?})", kind, kind.severity());
            }
        }
        for kind in self.present.iter().filter(|k| !now.contains(*k)) {
            debug!("fault cleared: {}", kind);
        }
        self.present = now;

        if let Some(target) = detection.shutdown {
            for kind in detection.faults.iter().filter(|k| k.is_forcing()) {
                warn!("protective shutdown: {} -> {} ({})", ctx.phase, target, kind);
            }
        }
        detection
    }

    /// Kinds present on the most recent evaluation.
    pub fn present(&self) -> FaultMask {
        self.present
    }
}
