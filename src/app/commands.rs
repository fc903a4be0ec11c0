//! Inbound commands to the simulator.
//!
//! These are what a presentation layer forwards from user input: the
//! pilot's start / stop / thrust buttons and the instructor's fault
//! toggles.  The [`Simulator`](super::service::Simulator) decides whether a
//! command is valid in the current phase.

use serde::{Deserialize, Serialize};

use crate::fault::FaultKind;

/// Pilot commands.  At most one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Valid only from OFF.
    Start,
    /// Valid only from STARTING or RUNNING.
    Stop,
    /// Valid only while RUNNING.
    ThrustUp,
    /// Valid only while RUNNING.
    ThrustDown,
}

/// An instructor toggle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultToggle {
    pub kind: FaultKind,
    pub armed: bool,
}

impl FaultToggle {
    pub fn arm(kind: FaultKind) -> Self {
        Self { kind, armed: true }
    }

    pub fn disarm(kind: FaultKind) -> Self {
        Self { kind, armed: false }
    }
}

/// Everything the outside world hands the core for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Caller's monotonic clock, milliseconds.
    pub now_ms: u64,
    pub command: Option<Command>,
    /// Applied in order, after the command.
    pub toggles: Vec<FaultToggle>,
}

impl TickInput {
    /// A tick with no command and no toggles.
    pub fn at(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_toggle(mut self, kind: FaultKind, armed: bool) -> Self {
        self.toggles.push(FaultToggle { kind, armed });
        self
    }
}
