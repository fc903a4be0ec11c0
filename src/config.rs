//! Simulator configuration parameters
//!
//! All tunable parameters for the simulation core.  Physical fault
//! thresholds are not here: they are part of each fault's fixed display
//! text and live next to the detector.

use serde::{Deserialize, Serialize};

use crate::engine::FUEL_CAPACITY;
use crate::error::ConfigError;

/// Core simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Timing ---
    /// Nominal tick period (milliseconds) used by the runner loop
    pub tick_period_ms: u32,

    // --- Noise ---
    /// Seed for the deterministic noise source
    pub rng_seed: u64,

    // --- Fuel ---
    /// Fuel quantity at start-up; also the baseline restored when the
    /// low-fuel toggle is disarmed
    pub initial_fuel: f64,

    // --- Alerting ---
    /// A live alert is purged once this long has passed since its last trigger
    pub alert_display_window_ms: u64,
    /// A re-detection this close to the last trigger is suppressed
    pub alert_dedup_window_ms: u64,
    /// A kind is written to the permanent log at most once per window
    pub log_dedup_window_ms: u64,

    // --- Telemetry ---
    /// Emit one telemetry record every N ticks (0 = disabled)
    pub telemetry_every_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_period_ms: 5, // ~200 Hz

            // Noise
            rng_seed: 0x7E57_5EED,

            // Fuel
            initial_fuel: 3000.0,

            // Alerting
            alert_display_window_ms: 5000,
            alert_dedup_window_ms: 5000,
            log_dedup_window_ms: 5000,

            // Telemetry
            telemetry_every_ticks: 1,
        }
    }
}

impl SimConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        }
        if !(0.0..=FUEL_CAPACITY).contains(&self.initial_fuel) {
            return Err(ConfigError::ValidationFailed(
                "initial_fuel must be within [0, 20000]",
            ));
        }
        if self.alert_display_window_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "alert_display_window_ms must be > 0",
            ));
        }
        if self.alert_dedup_window_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "alert_dedup_window_ms must be > 0",
            ));
        }
        if self.log_dedup_window_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "log_dedup_window_ms must be > 0",
            ));
        }
        Ok(())
    }
}
