//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌──────────┬───────────┬──────────┬─────────────────┐   │
//! │  │ Phase    │ on_enter  │ on_exit  │ on_update       │   │
//! │  ├──────────┼───────────┼──────────┼─────────────────┤   │
//! │  │ Off      │ fn(ctx)   │   -      │ fn(ctx)->Option │   │
//! │  │ Starting │ fn(ctx)   │   -      │ fn(ctx)->Option │   │
//! │  │ Running  │ fn(ctx)   │   -      │ fn(ctx)->Option │   │
//! │  │ Stopping │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │   │
//! │  └──────────┴───────────┴──────────┴─────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** phase, which
//! integrates the engine dynamics for that phase.  If it returns
//! `Some(next)`, the engine runs `on_exit` for the current phase, then
//! `on_enter` for the next.  Commands and forcing faults go through
//! [`Fsm::force_transition`], so every phase entry runs its `on_enter`
//! exactly once, whatever caused it.

pub mod context;
pub mod states;

use core::fmt;

use context::SimContext;
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Engine lifecycle phase.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    Off = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl Phase {
    /// Total number of phases, used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `Phase`.  Panics on out-of-range in debug
    /// builds; returns `Off` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::Stopping,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Off
            }
        }
    }

    /// STARTING or RUNNING: the phases a protective shutdown applies to.
    pub fn is_powered(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each transition.
pub type StateActionFn = fn(&mut SimContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut SimContext) -> Option<Phase>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single phase.
pub struct StateDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the current phase; the [`SimContext`] it
/// drives is owned by the caller and threaded through every handler.
pub struct Fsm {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [StateDescriptor; Phase::COUNT],
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current phase was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut SimContext) {
        info!("FSM starting in phase: {}", self.table[self.current].name);
        ctx.phase = self.current_state();
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current phase.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut SimContext) {
        self.tick_count += 1;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (commands and forcing faults).
    /// A request for the current phase is ignored.
    pub fn force_transition(&mut self, next: Phase, ctx: &mut SimContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current phase.
    pub fn current_state(&self) -> Phase {
        Phase::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current phase.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: Phase, ctx: &mut SimContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {} after {} ticks",
            self.table[self.current].name,
            self.table[next_idx].name,
            self.ticks_in_current_state()
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.phase = next_id;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
