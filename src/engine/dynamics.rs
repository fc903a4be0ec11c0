//! Per-phase integration rules.
//!
//! ```text
//!  OFF        N1 = FF = 0, EGT follows the ambient drift
//!  STARTING   N1 < 50 on either engine:  linear spool-up (62.5 %/s, FF +5/s)
//!             otherwise:                 log-growth curve of t, until N1 > 95
//!  RUNNING    no adjustment:  bounded random walk
//!             adjustment:     value += (target - value) * 0.1
//!  STOPPING   FF = 0, N1 and EGT decay on log10(e + 1) / log10(5)
//! ```
//!
//! Every function is driven by an injected [`Rng`] so runs are
//! reproducible from a seed.  The right engine is always rebuilt from the
//! left one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{AMBIENT_TEMPERATURE, EnginePair, ThrustAdjustment};

/// Linear spool-up rate, N1 % per second (10000 rpm/s over 40000 rpm rated).
pub const SPOOL_RATE: f64 = 10_000.0 / 40_000.0 * 100.0;
/// Fuel-flow ramp during the linear spool-up, per second.
pub const START_FUEL_RAMP: f64 = 5.0;
/// Both engines above this N1 switches STARTING to the log-growth curve.
pub const LOG_GROWTH_N1: f64 = 50.0;
/// Computed start-curve N1 above which the engine is declared RUNNING.
pub const RUNNING_N1: f64 = 95.0;
/// STOPPING ends once left N1 is at or below this.
pub const SHUTDOWN_N1: f64 = 1.0;

const SMOOTHING: f64 = 0.1;
const CONVERGED: f64 = 0.01;
/// Seconds after which the normalised decay factor reaches 1.
const DECAY_HORIZON_SECS: f64 = 4.0;

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

/// One of -1, 0, +1.
pub(crate) fn step_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(-1i32..=1))
}

/// Uniform in [-1, 1] with 0.01 resolution.
pub(crate) fn unit_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(-100i32..=100)) / 100.0
}

// ---------------------------------------------------------------------------
// Start curve
// ---------------------------------------------------------------------------

/// Closed-form STARTING curve evaluated at elapsed time `t` since start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartCurve {
    pub fuel_flow: f64,
    pub n1: f64,
    log: f64,
}

impl StartCurve {
    pub fn at(elapsed_secs: f64) -> Self {
        let x = (elapsed_secs - 1.0).max(1.0);
        let log = x.log10();
        let rpm = 23_000.0 * log + 20_000.0;
        Self {
            fuel_flow: (42.0 * log + 10.0).clamp(0.0, 50.0),
            n1: rpm / 400.0,
            log,
        }
    }

    /// EGT for the given curve coefficient (900 nominal, higher when an
    /// over-temperature start is being trained).
    pub fn temperature(&self, coefficient: f64) -> f64 {
        coefficient * self.log + AMBIENT_TEMPERATURE
    }

    /// True once the curve has spooled past [`RUNNING_N1`].
    pub fn is_spooled(&self) -> bool {
        self.n1 > RUNNING_N1
    }
}

// ---------------------------------------------------------------------------
// Phase integrators
// ---------------------------------------------------------------------------

pub fn integrate_off<R: Rng + ?Sized>(engines: &mut EnginePair, ambient: f64, rng: &mut R) {
    engines.set_n1(0.0);
    engines.set_fuel_flow(0.0);
    engines.left.temperature = ambient;
    engines.right.temperature = ambient + unit_noise(rng) * 0.005;
}

/// Returns `true` on the tick the start curve crosses [`RUNNING_N1`].
pub fn integrate_starting<R: Rng + ?Sized>(
    engines: &mut EnginePair,
    elapsed_secs: f64,
    dt_secs: f64,
    ambient: f64,
    egt_coefficient: f64,
    rng: &mut R,
) -> bool {
    if engines.left.n1 < LOG_GROWTH_N1 || engines.right.n1 < LOG_GROWTH_N1 {
        let left = &mut engines.left;
        left.n1 += SPOOL_RATE * dt_secs + step_noise(rng) * 0.3;
        left.fuel_flow += START_FUEL_RAMP * dt_secs;
        left.temperature = ambient;
        left.floor();

        engines.right.n1 = engines.left.n1;
        engines.right.fuel_flow = engines.left.fuel_flow;
        engines.right.temperature = engines.left.temperature + unit_noise(rng) * 0.005;
        return false;
    }

    let curve = StartCurve::at(elapsed_secs);
    let t = curve.temperature(egt_coefficient);
    for engine in [&mut engines.left, &mut engines.right] {
        engine.n1 = curve.n1 + step_noise(rng) * 0.3;
        engine.fuel_flow = curve.fuel_flow + step_noise(rng) * 0.03;
        engine.temperature = t + step_noise(rng) * 0.3;
        engine.floor();
    }
    curve.is_spooled()
}

/// Random walk, or smoothing toward the thrust targets while an
/// adjustment is pending.  Clears `thrust` once the left engine has
/// converged on all three targets.
pub fn integrate_running<R: Rng + ?Sized>(
    engines: &mut EnginePair,
    thrust: &mut ThrustAdjustment,
    rng: &mut R,
) {
    let left = &mut engines.left;
    let jitter = if thrust.is_pending() {
        left.n1 += (left.target_n1 - left.n1) * SMOOTHING;
        left.fuel_flow += (left.target_fuel_flow - left.fuel_flow) * SMOOTHING;
        left.temperature += (left.target_temperature - left.temperature) * SMOOTHING;
        (0.05, 0.03, 0.5)
    } else {
        left.n1 += step_noise(rng) * 0.05;
        left.fuel_flow += step_noise(rng) * 0.05;
        left.temperature += step_noise(rng) * 0.5;
        (0.03, 0.03, 0.03)
    };
    left.floor();

    let left = engines.left;
    let right = &mut engines.right;
    right.n1 = left.n1 + step_noise(rng) * jitter.0;
    right.fuel_flow = left.fuel_flow + step_noise(rng) * jitter.1;
    right.temperature = left.temperature + step_noise(rng) * jitter.2;
    right.floor();

    if thrust.is_pending()
        && (left.target_n1 - left.n1).abs() < CONVERGED
        && (left.target_fuel_flow - left.fuel_flow).abs() < CONVERGED
        && (left.target_temperature - left.temperature).abs() < CONVERGED
    {
        *thrust = ThrustAdjustment::None;
    }
}

/// Set new thrust targets relative to the current left-engine values.
///
/// Up: N1 and EGT × (1.03 + 0..=0.02), FF + 1.  Down: × (0.97 - 0..=0.02),
/// FF - 1 (never below 0).  Both engines get the same targets.
pub fn set_thrust_targets<R: Rng + ?Sized>(
    engines: &mut EnginePair,
    direction: ThrustAdjustment,
    rng: &mut R,
) {
    let (base, sign) = match direction {
        ThrustAdjustment::Increasing => (1.03, 1.0),
        ThrustAdjustment::Decreasing => (0.97, -1.0),
        ThrustAdjustment::None => return,
    };
    let n1_scale = base + sign * f64::from(rng.gen_range(0u8..3)) * 0.01;
    let t_scale = base + sign * f64::from(rng.gen_range(0u8..3)) * 0.01;

    let left = &mut engines.left;
    left.target_n1 = left.n1 * n1_scale;
    left.target_temperature = left.temperature * t_scale;
    left.target_fuel_flow = (left.fuel_flow + sign).max(0.0);

    engines.right.target_n1 = engines.left.target_n1;
    engines.right.target_temperature = engines.left.target_temperature;
    engines.right.target_fuel_flow = engines.left.target_fuel_flow;
}

/// Values captured once on STOPPING entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoppingEntry {
    pub initial_n1: f64,
    pub initial_temperature: f64,
    pub entered_ms: u64,
}

/// Normalised shutdown progress: 0 at entry, 1 after four seconds.
pub fn decay_factor(elapsed_secs: f64) -> f64 {
    (elapsed_secs + 1.0).log10() / (DECAY_HORIZON_SECS + 1.0).log10()
}

/// Returns `true` once left N1 has decayed to [`SHUTDOWN_N1`].
pub fn integrate_stopping(engines: &mut EnginePair, entry: &StoppingEntry, elapsed_secs: f64) -> bool {
    let remaining = 1.0 - decay_factor(elapsed_secs.max(0.0));
    engines.set_fuel_flow(0.0);
    engines.left.n1 = entry.initial_n1 * remaining;
    engines.left.temperature =
        AMBIENT_TEMPERATURE + (entry.initial_temperature - AMBIENT_TEMPERATURE) * remaining;
    engines.left.floor();
    engines.right.n1 = engines.left.n1;
    engines.right.temperature = engines.left.temperature;
    engines.left.n1 <= SHUTDOWN_N1
}
