//! Instructor fault toggles.
//!
//! Arming a toggle either fails sensor channels or drives the plant into
//! the fault's region; disarming restores a fixed pre-fault baseline.  The
//! two STARTING over-temperature toggles have no immediate effect: they
//! bias the start curve instead (see [`start_egt_coefficient`]).
//!
//! | Toggle                      | Arm                      | Disarm            |
//! |-----------------------------|--------------------------|-------------------|
//! | single N1 / EGT sensor      | left primary channel     | channel restored  |
//! | one-engine N1 / EGT         | both left channels       | both restored     |
//! | all N1 / all EGT            | all four channels        | all restored      |
//! | fuel sensor                 | quantity sensor failed   | sensor restored   |
//! | low fuel                    | fuel = 998               | fuel = initial    |
//! | over fuel flow              | FF = 52                  | FF = 40           |
//! | over speed 105 / 120        | N1 = 107 / 122           | N1 = 95           |
//! | over temp 950 / 1100 (run)  | EGT = 952 / 1102         | EGT = 730         |
//! | over temp 850 / 1000 (start)| start-curve bias only    | EGT = 730         |

use log::debug;

use crate::engine::SensorFaults;
use crate::fault::{FaultKind, FaultMask};
use crate::fsm::context::SimContext;

/// Pre-fault N1 restored by the over-speed toggles.
pub const BASELINE_N1: f64 = 95.0;
/// Pre-fault fuel flow restored by the over-fuel-flow toggle.
pub const BASELINE_FUEL_FLOW: f64 = 40.0;
/// Pre-fault EGT restored by every over-temperature toggle.
pub const BASELINE_TEMPERATURE: f64 = 730.0;
/// Quantity forced by the low-fuel toggle, just under the 1000 limit.
pub const LOW_FUEL_SENTINEL: f64 = 998.0;

const OVER_FUEL_FLOW_VALUE: f64 = 52.0;
const OVER_SPEED_1_VALUE: f64 = 107.0;
const OVER_SPEED_2_VALUE: f64 = 122.0;
const OVER_TEMP_3_VALUE: f64 = 952.0;
const OVER_TEMP_4_VALUE: f64 = 1102.0;

/// Start-curve EGT coefficients.
pub const NOMINAL_EGT_COEFFICIENT: f64 = 900.0;
pub const CAUTION_EGT_COEFFICIENT: f64 = 1170.0;
pub const WARNING_EGT_COEFFICIENT: f64 = 1500.0;

/// EGT coefficient of the log-growth start curve for the armed toggles.
///
/// 1170 drives a start past 850 (caution); 1500 past 1000 (protective
/// shutdown).  The warning bias wins when both are armed.
pub fn start_egt_coefficient(armed: FaultMask) -> f64 {
    if armed.contains(FaultKind::OverTemp2) {
        WARNING_EGT_COEFFICIENT
    } else if armed.contains(FaultKind::OverTemp1) {
        CAUTION_EGT_COEFFICIENT
    } else {
        NOMINAL_EGT_COEFFICIENT
    }
}

/// Apply one toggle edge.  Returns `false` (and changes nothing) when the
/// toggle is already in the requested state.
pub fn apply(ctx: &mut SimContext, kind: FaultKind, armed: bool) -> bool {
    if ctx.armed.contains(kind) == armed {
        return false;
    }
    if armed {
        ctx.armed.insert(kind);
    } else {
        ctx.armed.remove(kind);
    }
    debug!(
        "toggle {} {}",
        kind,
        if armed { "armed" } else { "disarmed" }
    );

    let engines = &mut ctx.engines;
    match kind {
        FaultKind::SingleN1SensorFail => {
            engines.left.sensor_faults.n1_primary = armed;
        }
        FaultKind::SingleEngineN1TotalFail => {
            set_n1_channels(&mut engines.left.sensor_faults, armed);
        }
        FaultKind::SingleEgtSensorFail => {
            engines.left.sensor_faults.egt_primary = armed;
        }
        FaultKind::SingleEngineEgtTotalFail => {
            set_egt_channels(&mut engines.left.sensor_faults, armed);
        }
        FaultKind::AllN1SensorsFail => {
            set_n1_channels(&mut engines.left.sensor_faults, armed);
            set_n1_channels(&mut engines.right.sensor_faults, armed);
        }
        FaultKind::AllEgtSensorsFail => {
            set_egt_channels(&mut engines.left.sensor_faults, armed);
            set_egt_channels(&mut engines.right.sensor_faults, armed);
        }
        FaultKind::FuelSensorFail => ctx.fuel.sensor_failed = armed,
        FaultKind::LowFuel => {
            ctx.fuel.remaining = if armed {
                LOW_FUEL_SENTINEL
            } else {
                ctx.config.initial_fuel
            };
        }
        FaultKind::OverFuelFlow => {
            engines.set_fuel_flow(if armed {
                OVER_FUEL_FLOW_VALUE
            } else {
                BASELINE_FUEL_FLOW
            });
        }
        FaultKind::OverSpeed1 => {
            engines.set_n1(if armed { OVER_SPEED_1_VALUE } else { BASELINE_N1 });
        }
        FaultKind::OverSpeed2 => {
            engines.set_n1(if armed { OVER_SPEED_2_VALUE } else { BASELINE_N1 });
        }
        FaultKind::OverTemp1 | FaultKind::OverTemp2 => {
            if !armed {
                engines.set_temperature(BASELINE_TEMPERATURE);
            }
        }
        FaultKind::OverTemp3 => {
            engines.set_temperature(if armed {
                OVER_TEMP_3_VALUE
            } else {
                BASELINE_TEMPERATURE
            });
        }
        FaultKind::OverTemp4 => {
            engines.set_temperature(if armed {
                OVER_TEMP_4_VALUE
            } else {
                BASELINE_TEMPERATURE
            });
        }
    }
    true
}

fn set_n1_channels(faults: &mut SensorFaults, failed: bool) {
    faults.n1_primary = failed;
    faults.n1_secondary = failed;
}

fn set_egt_channels(faults: &mut SensorFaults, failed: bool) {
    faults.egt_primary = failed;
    faults.egt_secondary = failed;
}
