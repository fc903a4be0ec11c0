//! Simulator service — the hexagonal core.
//!
//! [`Simulator`] owns the FSM, fault detector, alert aggregator and the
//! shared [`SimContext`].  One call to [`Simulator::tick`] is one fixed
//! tick, executed synchronously in this order:
//!
//! ```text
//!  clock ─▶ command ─▶ toggles ─▶ fuel ─▶ detector ─▶ forced shutdown
//!        ─▶ FSM (dynamics) ─▶ run light ─▶ alerts / log ─▶ telemetry
//! ```
//!
//! Commands, toggles and the fuel burn for `dt` all land before detection,
//! so the detector sees their effect in the same tick.

use log::{debug, info};

use crate::alerts::AlertAggregator;
use crate::config::SimConfig;
use crate::detector::FaultDetector;
use crate::engine::ThrustAdjustment;
use crate::engine::dynamics::{self, RUNNING_N1};
use crate::error::Result;
use crate::fsm::context::SimContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Phase};
use crate::toggles;

use super::commands::{Command, TickInput};
use super::events::{AppEvent, Snapshot, TelemetryRecord};
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// Simulator
// ───────────────────────────────────────────────────────────────

/// The simulator orchestrates all domain logic.
pub struct Simulator {
    fsm: Fsm,
    ctx: SimContext,
    detector: FaultDetector,
    alerts: AlertAggregator,
    tick_count: u64,
    started: bool,
}

impl Simulator {
    /// Construct the simulator from a validated configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next, or
    /// let the first [`tick`](Self::tick) do it.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Default configuration with the given noise seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_valid(SimConfig {
            rng_seed: seed,
            ..SimConfig::default()
        })
    }

    fn from_valid(config: SimConfig) -> Self {
        let alerts = AlertAggregator::new(&config);
        let ctx = SimContext::new(config);
        let fsm = Fsm::new(build_state_table(), Phase::Off);
        Self {
            fsm,
            ctx,
            detector: FaultDetector::new(),
            alerts,
            tick_count: 0,
            started: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in OFF with the clock at `now_ms`.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        if self.started {
            return;
        }
        self.ctx.advance_clock(now_ms);
        self.ctx.dt_secs = 0.0;
        self.ctx.reset_clock_origin();
        self.fsm.start(&mut self.ctx);
        self.started = true;
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("Simulator started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full tick and return the resulting snapshot.
    pub fn tick(&mut self, input: &TickInput, sink: &mut impl EventSink) -> Snapshot {
        if !self.started {
            self.start(input.now_ms, sink);
        }
        self.tick_count += 1;

        // 1. Clock
        self.ctx.advance_clock(input.now_ms);

        // 2. Pilot command, then instructor toggles
        if let Some(cmd) = input.command {
            self.handle_command(cmd, sink);
        }
        for t in &input.toggles {
            toggles::apply(&mut self.ctx, t.kind, t.armed);
        }
        self.ctx.advance_ambient();

        // 3. Fuel burned over dt
        let average_ff = self.ctx.engines.average_fuel_flow();
        self.ctx
            .fuel
            .deplete(average_ff, self.ctx.dt_secs, self.fsm.current_state());

        // 4. Fault detection; forcing faults shut the engines down
        let detection = self.detector.evaluate(&self.ctx);
        if let Some(target) = detection.shutdown {
            self.transition(target, sink);
        }

        // 5. Dynamics (FSM tick)
        let prev = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        self.emit_phase_change(prev, sink);

        // 6. Run light follows N1 once the engines have stabilised
        if self.ctx.stabilized {
            self.ctx.lights.run = self.ctx.engines.either_n1_at_least(RUNNING_N1);
        }

        // 7. Alerts and permanent log
        let now = self.ctx.now_ms;
        let elapsed = self.ctx.elapsed_ms();
        for &kind in &detection.faults {
            if let (_, Some(entry)) = self.alerts.submit(kind, now, elapsed) {
                sink.emit(&AppEvent::FaultLogged(entry));
            }
        }
        self.alerts.purge(now);

        // 8. Telemetry
        let every = u64::from(self.ctx.config.telemetry_every_ticks);
        if every > 0 && self.tick_count % every == 0 {
            sink.emit(&AppEvent::Telemetry(self.telemetry()));
        }

        self.snapshot()
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a pilot command.  Commands invalid in the current phase are
    /// ignored.
    fn handle_command(&mut self, cmd: Command, sink: &mut impl EventSink) {
        let phase = self.fsm.current_state();
        match (cmd, phase) {
            (Command::Start, Phase::Off) => {
                info!("Start command");
                self.transition(Phase::Starting, sink);
            }
            (Command::Stop, Phase::Starting | Phase::Running) => {
                info!("Stop command from {}", phase);
                self.transition(Phase::Stopping, sink);
            }
            (Command::ThrustUp, Phase::Running) => self.set_thrust(ThrustAdjustment::Increasing),
            (Command::ThrustDown, Phase::Running) => self.set_thrust(ThrustAdjustment::Decreasing),
            _ => debug!("{:?} ignored in {}", cmd, phase),
        }
    }

    fn set_thrust(&mut self, direction: ThrustAdjustment) {
        self.ctx.thrust = direction;
        dynamics::set_thrust_targets(&mut self.ctx.engines, direction, &mut self.ctx.rng);
        let left = &self.ctx.engines.left;
        info!(
            "Thrust {:?}: targets N1 {:.1}, FF {:.1}, EGT {:.0}",
            direction, left.target_n1, left.target_fuel_flow, left.target_temperature
        );
    }

    // ── Queries ───────────────────────────────────────────────

    /// Display snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let engines = self.ctx.engines.clamped();
        Snapshot {
            elapsed_ms: self.ctx.elapsed_ms(),
            phase: self.fsm.current_state(),
            left: engines.left,
            right: engines.right,
            fuel: self.ctx.fuel,
            thrust: self.ctx.thrust,
            live_alerts: self.alerts.live().to_vec(),
            worst_severity: self.alerts.worst_severity(),
            start_light_on: self.ctx.lights.start,
            run_light_on: self.ctx.lights.run,
        }
    }

    /// Telemetry row for the current state (raw, unclamped values).
    pub fn telemetry(&self) -> TelemetryRecord {
        let e = &self.ctx.engines;
        TelemetryRecord {
            elapsed_ms: self.ctx.elapsed_ms(),
            left_n1: e.left.n1,
            right_n1: e.right.n1,
            left_temperature: e.left.temperature,
            right_temperature: e.right.temperature,
            left_fuel_flow: e.left.fuel_flow,
            right_fuel_flow: e.right.fuel_flow,
            fuel_remaining: self.ctx.fuel.remaining,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.fsm.current_state()
    }

    /// Read access to the full simulation context.
    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Mutable access, for instructor-style scripted setups and tests.
    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    pub fn alerts(&self) -> &AlertAggregator {
        &self.alerts
    }

    pub fn config(&self) -> &SimConfig {
        &self.ctx.config
    }

    /// Total ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(&mut self, target: Phase, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        self.fsm.force_transition(target, &mut self.ctx);
        self.emit_phase_change(prev, sink);
    }

    fn emit_phase_change(&self, prev: Phase, sink: &mut impl EventSink) {
        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::PhaseChanged { from: prev, to: now });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::{FaultKind, Severity};

    const TICK: u64 = 5;

    fn sim() -> (Simulator, Vec<AppEvent>) {
        let mut sink = Vec::new();
        let mut s = Simulator::with_seed(3);
        s.start(0, &mut sink);
        (s, sink)
    }

    /// Tick with no input until `pred` holds or `max` ticks elapse.
    fn run_until(
        s: &mut Simulator,
        sink: &mut Vec<AppEvent>,
        max: usize,
        pred: impl Fn(&Simulator) -> bool,
    ) -> bool {
        for _ in 0..max {
            let now = s.context().now_ms + TICK;
            s.tick(&TickInput::at(now), sink);
            if pred(s) {
                return true;
            }
        }
        false
    }

    fn start_and_run(s: &mut Simulator, sink: &mut Vec<AppEvent>) {
        let now = s.context().now_ms + TICK;
        s.tick(&TickInput::at(now).with_command(Command::Start), sink);
        assert!(run_until(s, sink, 3_000, |s| s.phase() == Phase::Running));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = SimConfig {
            tick_period_ms: 0,
            ..Default::default()
        };
        assert!(Simulator::new(cfg).is_err());
    }

    #[test]
    fn quiet_snapshot_has_no_master_severity() {
        let (s, _) = sim();
        let snap = s.snapshot();
        assert!(snap.live_alerts.is_empty());
        assert_eq!(snap.worst_severity, None);
    }

    #[test]
    fn start_emits_started_in_off() {
        let (s, sink) = sim();
        assert_eq!(s.phase(), Phase::Off);
        assert_eq!(sink, vec![AppEvent::Started(Phase::Off)]);
    }

    #[test]
    fn start_command_only_from_off() {
        let (mut s, mut sink) = sim();
        let snap = s.tick(&TickInput::at(5).with_command(Command::Start), &mut sink);
        assert_eq!(snap.phase, Phase::Starting);
        assert!(snap.start_light_on);
        assert!(sink.contains(&AppEvent::PhaseChanged {
            from: Phase::Off,
            to: Phase::Starting
        }));

        // A second start while starting is ignored, clock origin untouched
        let origin = s.context().clock_origin_ms;
        s.tick(&TickInput::at(500).with_command(Command::Start), &mut sink);
        assert_eq!(s.context().clock_origin_ms, origin);
    }

    #[test]
    fn stop_ignored_when_off() {
        let (mut s, mut sink) = sim();
        let snap = s.tick(&TickInput::at(5).with_command(Command::Stop), &mut sink);
        assert_eq!(snap.phase, Phase::Off);
    }

    #[test]
    fn thrust_ignored_outside_running() {
        let (mut s, mut sink) = sim();
        s.tick(&TickInput::at(5).with_command(Command::Start), &mut sink);
        let snap = s.tick(&TickInput::at(10).with_command(Command::ThrustUp), &mut sink);
        assert_eq!(snap.thrust, ThrustAdjustment::None);
    }

    #[test]
    fn full_cycle_off_start_run_stop_off() {
        let (mut s, mut sink) = sim();
        start_and_run(&mut s, &mut sink);
        assert!(s.context().stabilized);
        assert!(!s.context().lights.start);
        assert_eq!(
            s.context().lights.run,
            s.context().engines.either_n1_at_least(RUNNING_N1)
        );

        let now = s.context().now_ms + TICK;
        let snap = s.tick(&TickInput::at(now).with_command(Command::Stop), &mut sink);
        assert_eq!(snap.phase, Phase::Stopping);
        assert_eq!(snap.left.fuel_flow, 0.0);

        assert!(run_until(&mut s, &mut sink, 2_000, |s| s.phase() == Phase::Off));
        assert!(!s.context().lights.run);

        let changes: Vec<_> = sink
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![Phase::Starting, Phase::Running, Phase::Stopping, Phase::Off]
        );
    }

    #[test]
    fn thrust_up_settles_and_clears() {
        let (mut s, mut sink) = sim();
        start_and_run(&mut s, &mut sink);
        let now = s.context().now_ms + TICK;
        let snap = s.tick(&TickInput::at(now).with_command(Command::ThrustUp), &mut sink);
        // Targets set this tick; first smoothing step already applied
        assert_eq!(snap.thrust, ThrustAdjustment::Increasing);
        assert!(run_until(&mut s, &mut sink, 500, |s| !s.context().thrust.is_pending()));
        let left = s.context().engines.left;
        assert!((left.target_n1 - left.n1).abs() < 0.01);
    }

    #[test]
    fn over_speed_2_toggle_forces_stop_and_logs() {
        let (mut s, mut sink) = sim();
        start_and_run(&mut s, &mut sink);
        let now = s.context().now_ms + TICK;
        let snap = s.tick(
            &TickInput::at(now).with_toggle(FaultKind::OverSpeed2, true),
            &mut sink,
        );
        assert_eq!(snap.phase, Phase::Stopping);
        assert_eq!(s.context().stopping.map(|e| e.initial_n1), Some(122.0));
        assert!(snap.live_alerts.iter().any(|a| a.kind == FaultKind::OverSpeed2));
        assert_eq!(snap.worst_severity, Some(Severity::Warning));
        assert!(s.alerts().log().iter().any(|l| l.kind == FaultKind::OverSpeed2));
    }

    #[test]
    fn fuel_sensor_failure_freezes_quantity() {
        let (mut s, mut sink) = sim();
        start_and_run(&mut s, &mut sink);
        let now = s.context().now_ms + TICK;
        s.tick(
            &TickInput::at(now).with_toggle(FaultKind::FuelSensorFail, true),
            &mut sink,
        );
        let before = s.context().fuel.remaining;
        run_until(&mut s, &mut sink, 100, |_| false);
        assert_eq!(s.context().fuel.remaining, before);
        assert!(!s.snapshot().fuel.quantity_valid());
    }

    #[test]
    fn telemetry_follows_configured_period() {
        let cfg = SimConfig {
            telemetry_every_ticks: 10,
            ..Default::default()
        };
        let mut s = Simulator::new(cfg).unwrap();
        let mut sink = Vec::new();
        for i in 1..=100u64 {
            s.tick(&TickInput::at(i * TICK), &mut sink);
        }
        let n = sink
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count();
        assert_eq!(n, 10);
    }

    #[test]
    fn snapshot_clamps_display_values() {
        let (mut s, mut sink) = sim();
        start_and_run(&mut s, &mut sink);
        s.context_mut().engines.set_n1(119.0);
        s.context_mut().engines.left.temperature = 1250.0;
        let snap = s.snapshot();
        assert_eq!(snap.left.temperature, 1200.0);
        assert_eq!(snap.left.n1, 119.0);
    }
}
