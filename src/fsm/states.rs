//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch.  `on_update` runs the engine dynamics for its phase.
//!
//! ```text
//!  OFF ──[start]──▶ STARTING ──[curve N1 > 95]──▶ RUNNING
//!   ▲                  │                             │
//!   │            [stop / forcing fault]     [stop / forcing fault]
//!   │                  ▼                             │
//!   └──[N1 <= 1]─── STOPPING ◀───────────────────────┘
//!
//!  STARTING / STOPPING ──[all N1 or all EGT lost, N1 <= 1]──▶ OFF
//! ```

use log::info;

use super::context::SimContext;
use super::{Phase, StateDescriptor};
use crate::engine::ThrustAdjustment;
use crate::engine::dynamics::{self, StoppingEntry};
use crate::toggles;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the phase table.  Called once per simulator.
pub fn build_state_table() -> [StateDescriptor; Phase::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: Phase::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
        // Index 1 — Starting
        StateDescriptor {
            id: Phase::Starting,
            name: "Starting",
            on_enter: Some(starting_enter),
            on_exit: None,
            on_update: starting_update,
        },
        // Index 2 — Running
        StateDescriptor {
            id: Phase::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: None,
            on_update: running_update,
        },
        // Index 3 — Stopping
        StateDescriptor {
            id: Phase::Stopping,
            name: "Stopping",
            on_enter: Some(stopping_enter),
            on_exit: Some(stopping_exit),
            on_update: stopping_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut SimContext) {
    ctx.engines.set_n1(0.0);
    ctx.engines.set_fuel_flow(0.0);
    ctx.thrust = ThrustAdjustment::None;
    ctx.lights.start = false;
    ctx.lights.run = false;
    ctx.stabilized = false;
    info!("OFF: engines shut down, fuel {:.0}", ctx.fuel.remaining);
}

fn off_update(ctx: &mut SimContext) -> Option<Phase> {
    let ambient = ctx.ambient.value;
    dynamics::integrate_off(&mut ctx.engines, ambient, &mut ctx.rng);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STARTING — linear spool-up, then the log-growth start curve
// ═══════════════════════════════════════════════════════════════════════════

fn starting_enter(ctx: &mut SimContext) {
    ctx.reset_clock_origin();
    ctx.lights.start = true;
    ctx.lights.run = false;
    info!(
        "STARTING: clock origin reset at {} ms, EGT coefficient {:.0}",
        ctx.clock_origin_ms,
        toggles::start_egt_coefficient(ctx.armed)
    );
}

fn starting_update(ctx: &mut SimContext) -> Option<Phase> {
    let ambient = ctx.ambient.value;
    let coefficient = toggles::start_egt_coefficient(ctx.armed);
    let spooled = dynamics::integrate_starting(
        &mut ctx.engines,
        ctx.elapsed_secs,
        ctx.dt_secs,
        ambient,
        coefficient,
        &mut ctx.rng,
    );
    if spooled {
        info!(
            "STARTING: N1 {:.1} after {:.3}s, engines stabilised",
            ctx.engines.left.n1, ctx.elapsed_secs
        );
        return Some(Phase::Running);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING — steady state, thrust adjustments
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut SimContext) {
    ctx.stabilized = true;
    ctx.lights.start = false;
    ctx.lights.run = true;
    info!("RUNNING: N1 {:.1}, EGT {:.0}", ctx.engines.left.n1, ctx.engines.left.temperature);
}

fn running_update(ctx: &mut SimContext) -> Option<Phase> {
    let before = ctx.thrust;
    dynamics::integrate_running(&mut ctx.engines, &mut ctx.thrust, &mut ctx.rng);
    if before.is_pending() && !ctx.thrust.is_pending() {
        info!(
            "RUNNING: thrust settled at N1 {:.1}, FF {:.1}, EGT {:.0}",
            ctx.engines.left.n1, ctx.engines.left.fuel_flow, ctx.engines.left.temperature
        );
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPING — fuel cut, log decay of N1 and EGT
// ═══════════════════════════════════════════════════════════════════════════

fn stopping_enter(ctx: &mut SimContext) {
    ctx.thrust = ThrustAdjustment::None;
    ctx.engines.set_fuel_flow(0.0);
    let entry = StoppingEntry {
        initial_n1: ctx.engines.left.n1,
        initial_temperature: ctx.engines.left.temperature,
        entered_ms: ctx.now_ms,
    };
    ctx.stopping = Some(entry);
    info!(
        "STOPPING: fuel cut, decaying from N1 {:.1} / EGT {:.0}",
        entry.initial_n1, entry.initial_temperature
    );
}

fn stopping_exit(ctx: &mut SimContext) {
    ctx.stopping = None;
}

fn stopping_update(ctx: &mut SimContext) -> Option<Phase> {
    let (Some(entry), Some(e)) = (ctx.stopping, ctx.stopping_elapsed_secs()) else {
        // Entered without capture: nothing to decay from.
        return Some(Phase::Off);
    };
    if dynamics::integrate_stopping(&mut ctx.engines, &entry, e) {
        return Some(Phase::Off);
    }
    None
}
