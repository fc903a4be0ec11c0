//! Scripted scenarios for headless runs.
//!
//! A scenario is a JSON document: a duration and a list of timed steps,
//! each either a pilot command or an instructor toggle.
//!
//! ```json
//! {
//!   "name": "over speed",
//!   "duration_ms": 15000,
//!   "steps": [
//!     { "at_ms": 0,    "command": "start" },
//!     { "at_ms": 9000, "toggle": { "kind": "OverSpeed1", "armed": true } }
//!   ]
//! }
//! ```
//!
//! Step times are relative to the start of the run.

use std::collections::VecDeque;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::commands::{Command, FaultToggle, TickInput};
use crate::app::events::Snapshot;
use crate::app::ports::{Clock, EventSink};
use crate::app::service::Simulator;
use crate::error::{ConfigError, Result};

/// What a step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Command(Command),
    Toggle(FaultToggle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub ticks: u64,
    pub snapshot: Snapshot,
    /// Permanent log lines, oldest first.
    pub log: Vec<String>,
}

impl Scenario {
    /// Parse and validate a scenario document.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut scenario: Scenario = serde_json::from_str(text)?;
        scenario.normalize()?;
        Ok(scenario)
    }

    /// Sort steps by time (stable, so same-time steps keep file order) and
    /// reject steps past the end of the run.
    pub fn normalize(&mut self) -> Result<()> {
        if self.duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("duration_ms must be > 0").into());
        }
        if self.steps.iter().any(|s| s.at_ms > self.duration_ms) {
            return Err(ConfigError::ValidationFailed("step at_ms exceeds duration_ms").into());
        }
        self.steps.sort_by_key(|s| s.at_ms);
        Ok(())
    }

    /// Drive `sim` through the scenario, one tick per clock period.
    ///
    /// Toggles due in a tick are all applied in that tick.  Only one command
    /// is accepted per tick; further commands due at the same time are
    /// deferred to the following ticks in order.
    pub fn run(
        &self,
        sim: &mut Simulator,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> ScenarioReport {
        let period = u64::from(sim.config().tick_period_ms);
        let origin = clock.now_ms();
        sim.start(origin, sink);
        info!(
            "scenario '{}': {} steps over {} ms",
            self.name,
            self.steps.len(),
            self.duration_ms
        );

        let mut steps = self.steps.iter().peekable();
        let mut deferred: VecDeque<Command> = VecDeque::new();
        let mut ticks = 0u64;
        let mut snapshot = sim.snapshot();

        loop {
            clock.wait_tick(period);
            let now = clock.now_ms();
            let rel = now.saturating_sub(origin);

            let mut input = TickInput::at(now);
            while let Some(step) = steps.next_if(|s| s.at_ms <= rel) {
                match step.action {
                    Action::Command(c) => deferred.push_back(c),
                    Action::Toggle(t) => input.toggles.push(t),
                }
            }
            input.command = deferred.pop_front();
            if let Some(c) = input.command {
                debug!("{} ms: command {:?}", rel, c);
            }

            snapshot = sim.tick(&input, sink);
            ticks += 1;
            if rel >= self.duration_ms {
                break;
            }
        }

        ScenarioReport {
            ticks,
            snapshot,
            log: sim.alerts().log().iter().map(|e| e.to_string()).collect(),
        }
    }
}
