//! Engine and fuel state.
//!
//! Two [`EngineReadout`]s (left, right) and one [`FuelState`] make up the
//! physical plant.  The right engine carries no dynamics of its own: every
//! integration rule in [`dynamics`] derives it from the left engine plus
//! small independent noise.  Only the sensor-fault flags are truly
//! per-engine.

pub mod dynamics;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fsm::Phase;

/// Tank capacity.  Fuel quantity never leaves `[0, FUEL_CAPACITY]`.
pub const FUEL_CAPACITY: f64 = 20_000.0;

/// Temperature the exhaust settles to with the engines off.
pub const AMBIENT_TEMPERATURE: f64 = 20.0;

/// Display range of the N1 gauge.
pub const N1_DISPLAY_MAX: f64 = 125.0;
/// Display range of the EGT gauge.
pub const EGT_DISPLAY_MIN: f64 = -5.0;
pub const EGT_DISPLAY_MAX: f64 = 1200.0;

// ---------------------------------------------------------------------------
// Engine readout
// ---------------------------------------------------------------------------

/// Redundant sensor channels of one engine.  `true` = channel failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorFaults {
    pub n1_primary: bool,
    pub n1_secondary: bool,
    pub egt_primary: bool,
    pub egt_secondary: bool,
}

impl SensorFaults {
    /// Both N1 channels lost.
    pub fn n1_total(self) -> bool {
        self.n1_primary && self.n1_secondary
    }

    /// At least one N1 channel lost.
    pub fn n1_any(self) -> bool {
        self.n1_primary || self.n1_secondary
    }

    /// Both EGT channels lost.
    pub fn egt_total(self) -> bool {
        self.egt_primary && self.egt_secondary
    }

    /// At least one EGT channel lost.
    pub fn egt_any(self) -> bool {
        self.egt_primary || self.egt_secondary
    }
}

/// Indicated values of one engine.
///
/// The `target_*` fields are only meaningful while a thrust adjustment is
/// pending; otherwise they hold whatever the last command left there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineReadout {
    /// Rotational speed, percent of rated.  Never negative.
    pub n1: f64,
    /// Exhaust gas temperature, °C.
    pub temperature: f64,
    /// Fuel flow.  Never negative.
    pub fuel_flow: f64,
    pub sensor_faults: SensorFaults,
    pub target_n1: f64,
    pub target_temperature: f64,
    pub target_fuel_flow: f64,
}

impl Default for EngineReadout {
    fn default() -> Self {
        Self {
            n1: 0.0,
            temperature: AMBIENT_TEMPERATURE,
            fuel_flow: 0.0,
            sensor_faults: SensorFaults::default(),
            target_n1: 0.0,
            target_temperature: AMBIENT_TEMPERATURE,
            target_fuel_flow: 0.0,
        }
    }
}

impl EngineReadout {
    /// False when both N1 channels are lost (gauge shows "--").
    pub fn n1_valid(&self) -> bool {
        !self.sensor_faults.n1_total()
    }

    /// False when both EGT channels are lost.
    pub fn egt_valid(&self) -> bool {
        !self.sensor_faults.egt_total()
    }

    /// Copy with every value pulled into its display range.
    pub fn clamped(&self) -> Self {
        Self {
            n1: self.n1.clamp(0.0, N1_DISPLAY_MAX),
            temperature: self.temperature.clamp(EGT_DISPLAY_MIN, EGT_DISPLAY_MAX),
            fuel_flow: self.fuel_flow.max(0.0),
            ..*self
        }
    }

    /// Enforce the physical floor on the integrated values.
    pub(crate) fn floor(&mut self) {
        self.n1 = self.n1.max(0.0);
        self.fuel_flow = self.fuel_flow.max(0.0);
    }
}

/// Both engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnginePair {
    pub left: EngineReadout,
    pub right: EngineReadout,
}

impl EnginePair {
    /// Mean of the two fuel flows; this is what the tank is drained by.
    pub fn average_fuel_flow(&self) -> f64 {
        (self.left.fuel_flow + self.right.fuel_flow) * 0.5
    }

    /// True if either engine's N1 is at or above `limit`.
    pub fn either_n1_at_least(&self, limit: f64) -> bool {
        self.left.n1 >= limit || self.right.n1 >= limit
    }

    pub fn set_n1(&mut self, n1: f64) {
        self.left.n1 = n1;
        self.right.n1 = n1;
    }

    pub fn set_temperature(&mut self, t: f64) {
        self.left.temperature = t;
        self.right.temperature = t;
    }

    pub fn set_fuel_flow(&mut self, ff: f64) {
        self.left.fuel_flow = ff;
        self.right.fuel_flow = ff;
    }

    pub fn clamped(&self) -> Self {
        Self {
            left: self.left.clamped(),
            right: self.right.clamped(),
        }
    }
}

// ---------------------------------------------------------------------------
// Fuel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelState {
    pub remaining: f64,
    pub sensor_failed: bool,
}

impl FuelState {
    pub fn new(initial: f64) -> Self {
        Self {
            remaining: initial.clamp(0.0, FUEL_CAPACITY),
            sensor_failed: false,
        }
    }

    /// Drain the tank by `average_ff * dt_secs`.
    ///
    /// Frozen while the engines are off or the quantity sensor has failed.
    pub fn deplete(&mut self, average_ff: f64, dt_secs: f64, phase: Phase) {
        if self.sensor_failed || phase == Phase::Off {
            return;
        }
        self.remaining = (self.remaining - average_ff * dt_secs).clamp(0.0, FUEL_CAPACITY);
    }

    /// False when the quantity indication is unusable.
    pub fn quantity_valid(&self) -> bool {
        !self.sensor_failed
    }
}

// ---------------------------------------------------------------------------
// Thrust adjustment
// ---------------------------------------------------------------------------

/// Pending thrust adjustment.  Only ever non-`None` while RUNNING.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrustAdjustment {
    #[default]
    None,
    Increasing,
    Decreasing,
}

impl ThrustAdjustment {
    pub fn is_pending(self) -> bool {
        self != Self::None
    }
}

// ---------------------------------------------------------------------------
// Ambient temperature drift
// ---------------------------------------------------------------------------

/// Damped random walk around [`AMBIENT_TEMPERATURE`].
///
/// Each step nudges a velocity term by a small random amount, integrates
/// it, damps it by 0.9 and pulls the value back toward the baseline by 5 %.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientDrift {
    pub value: f64,
    pub delta: f64,
}

impl Default for AmbientDrift {
    fn default() -> Self {
        Self {
            value: AMBIENT_TEMPERATURE,
            delta: 0.0,
        }
    }
}

impl AmbientDrift {
    const DAMPING: f64 = 0.9;
    const SPRING: f64 = 0.05;
    const MIN: f64 = 18.5;
    const MAX: f64 = 21.5;

    /// Advance one tick and return the new value.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        self.delta += dynamics::unit_noise(rng) * 0.005;
        self.value += self.delta;
        self.delta *= Self::DAMPING;
        self.value += (AMBIENT_TEMPERATURE - self.value) * Self::SPRING;
        self.value = self.value.clamp(Self::MIN, Self::MAX);
        self.value
    }
}
