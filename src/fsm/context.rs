//! Shared mutable context threaded through every FSM handler.
//!
//! `SimContext` is the single owned struct that state handlers, the fault
//! detector and the instructor toggles read from and write to: engine
//! readouts, fuel, thrust adjustment, indicator lights, timing, the armed
//! fault toggles and the noise source.  It replaces every piece of ambient
//! global state; there is exactly one per [`Simulator`](crate::app::service::Simulator).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::Phase;
use crate::config::SimConfig;
use crate::engine::dynamics::StoppingEntry;
use crate::engine::{AmbientDrift, EnginePair, FuelState, ThrustAdjustment};
use crate::fault::FaultMask;

// ---------------------------------------------------------------------------
// Indicator lights
// ---------------------------------------------------------------------------

/// Cockpit annunciators driven by the phase handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lights {
    /// Lit from the start command until the engines reach RUNNING.
    pub start: bool,
    /// Lit while running at speed (see the stabilized latch).
    pub run: bool,
}

// ---------------------------------------------------------------------------
// SimContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct SimContext {
    // -- Timing --
    /// Timestamp of the current tick (ms, caller's clock).
    pub now_ms: u64,
    /// Simulation time origin; reset on every start command.
    pub clock_origin_ms: u64,
    /// `t`: seconds since the clock origin.
    pub elapsed_secs: f64,
    /// `dt`: seconds since the previous tick.
    pub dt_secs: f64,

    // -- Phase --
    /// Mirror of the FSM's current phase, maintained by the FSM engine.
    pub phase: Phase,

    // -- Plant --
    pub engines: EnginePair,
    pub fuel: FuelState,
    pub ambient: AmbientDrift,

    // -- Pilot / annunciators --
    pub thrust: ThrustAdjustment,
    pub lights: Lights,
    /// Set on RUNNING entry, cleared on OFF entry.  While set, the run
    /// light follows N1 >= 95.
    pub stabilized: bool,

    // -- Phase-entry data --
    /// Captured on STOPPING entry, dropped on exit.
    pub stopping: Option<StoppingEntry>,

    // -- Instructor --
    /// Fault toggles currently armed by the instructor.
    pub armed: FaultMask,

    // -- Configuration --
    pub config: SimConfig,

    // -- Noise --
    pub rng: ChaCha8Rng,
}

impl SimContext {
    /// Create a new context with the given configuration.  The noise
    /// source is seeded from `config.rng_seed`.
    pub fn new(config: SimConfig) -> Self {
        Self {
            now_ms: 0,
            clock_origin_ms: 0,
            elapsed_secs: 0.0,
            dt_secs: 0.0,
            phase: Phase::Off,
            engines: EnginePair::default(),
            fuel: FuelState::new(config.initial_fuel),
            ambient: AmbientDrift::default(),
            thrust: ThrustAdjustment::None,
            lights: Lights::default(),
            stabilized: false,
            stopping: None,
            armed: FaultMask::EMPTY,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    /// Move the clock to `now_ms` and recompute `t` and `dt`.
    /// A timestamp earlier than the previous one yields `dt = 0`.
    pub fn advance_clock(&mut self, now_ms: u64) {
        self.dt_secs = now_ms.saturating_sub(self.now_ms) as f64 / 1000.0;
        self.now_ms = now_ms;
        self.elapsed_secs = self.elapsed_ms() as f64 / 1000.0;
    }

    /// Reset the simulation time origin to the current tick.
    pub fn reset_clock_origin(&mut self) {
        self.clock_origin_ms = self.now_ms;
        self.elapsed_secs = 0.0;
    }

    /// Milliseconds since the clock origin (the permanent-log timestamp).
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.clock_origin_ms)
    }

    /// Seconds spent in STOPPING so far, if stopping.
    pub fn stopping_elapsed_secs(&self) -> Option<f64> {
        self.stopping
            .map(|e| self.now_ms.saturating_sub(e.entered_ms) as f64 / 1000.0)
    }

    /// Advance the ambient drift one step.  Runs every tick in every phase.
    pub fn advance_ambient(&mut self) -> f64 {
        self.ambient.step(&mut self.rng)
    }
}
