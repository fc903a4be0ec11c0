//! Instructor fault injection, end to end through the simulator.

use turbine_sim::app::commands::{Command, TickInput};
use turbine_sim::app::service::Simulator;
use turbine_sim::fault::{FaultKind, Severity};
use turbine_sim::fsm::Phase;

use super::mock_sink::RecordingSink;

const TICK: u64 = 5;

fn running(seed: u64) -> (Simulator, RecordingSink, u64) {
    let mut sink = RecordingSink::new();
    let mut sim = Simulator::with_seed(seed);
    let mut now = 0;
    sim.start(now, &mut sink);
    now += TICK;
    sim.tick(&TickInput::at(now).with_command(Command::Start), &mut sink);
    while sim.phase() != Phase::Running {
        now += TICK;
        sim.tick(&TickInput::at(now), &mut sink);
        assert!(now < 20_000, "never reached RUNNING");
    }
    (sim, sink, now)
}

#[test]
fn single_n1_sensor_fail_is_caution_only() {
    let (mut sim, mut sink, now) = running(1);
    let snap = sim.tick(
        &TickInput::at(now + TICK).with_toggle(FaultKind::SingleN1SensorFail, true),
        &mut sink,
    );
    assert_eq!(snap.phase, Phase::Running);
    // One channel left, the gauge still reads
    assert!(snap.left.sensor_faults.n1_primary);
    assert!(snap.left.n1_valid());
    assert!(!snap.right.sensor_faults.n1_any());
    assert_eq!(sink.logged(FaultKind::SingleN1SensorFail), 1);
}

#[test]
fn single_engine_egt_loss_reported_once_per_tick() {
    let (mut sim, mut sink, now) = running(2);
    sim.tick(
        &TickInput::at(now + TICK).with_toggle(FaultKind::SingleEngineEgtTotalFail, true),
        &mut sink,
    );
    assert_eq!(sink.logged(FaultKind::SingleEngineEgtTotalFail), 1);
    assert_eq!(sink.logged(FaultKind::SingleEgtSensorFail), 0);
    assert_eq!(sim.phase(), Phase::Running);
}

#[test]
fn over_fuel_flow_caution_keeps_running() {
    let (mut sim, mut sink, now) = running(3);
    let snap = sim.tick(
        &TickInput::at(now + TICK).with_toggle(FaultKind::OverFuelFlow, true),
        &mut sink,
    );
    assert_eq!(snap.phase, Phase::Running);
    assert!(snap.left.fuel_flow > 50.0);
    let alert = snap
        .live_alerts
        .iter()
        .find(|a| a.kind == FaultKind::OverFuelFlow)
        .expect("live alert");
    assert_eq!(alert.severity, Severity::Caution);
}

#[test]
fn over_temp_warning_while_running_shuts_down() {
    let (mut sim, mut sink, now) = running(4);
    let snap = sim.tick(
        &TickInput::at(now + TICK).with_toggle(FaultKind::OverTemp4, true),
        &mut sink,
    );
    assert_eq!(snap.phase, Phase::Stopping);
    assert_eq!(sink.logged(FaultKind::OverTemp4), 1);
    assert_eq!(
        sim.context().stopping.map(|e| e.initial_temperature),
        Some(1102.0)
    );
}

#[test]
fn all_egt_loss_shuts_down_and_reaches_off() {
    let (mut sim, mut sink, mut now) = running(5);
    now += TICK;
    sim.tick(
        &TickInput::at(now).with_toggle(FaultKind::AllEgtSensorsFail, true),
        &mut sink,
    );
    assert_eq!(sim.phase(), Phase::Stopping);
    for _ in 0..2_000 {
        now += TICK;
        sim.tick(&TickInput::at(now), &mut sink);
        if sim.phase() == Phase::Off {
            break;
        }
    }
    assert_eq!(sim.phase(), Phase::Off);
    assert_eq!(
        sink.phases(),
        vec![Phase::Starting, Phase::Running, Phase::Stopping, Phase::Off]
    );
}

#[test]
fn fuel_sensor_failure_freezes_quantity_and_logs_once_per_window() {
    let (mut sim, mut sink, mut now) = running(6);
    now += TICK;
    sim.tick(
        &TickInput::at(now).with_toggle(FaultKind::FuelSensorFail, true),
        &mut sink,
    );
    let frozen = sim.context().fuel.remaining;
    // 12 s with the sensor failed: logged at 0, 5 and 10 s
    for _ in 0..(12_000 / TICK) {
        now += TICK;
        sim.tick(&TickInput::at(now), &mut sink);
    }
    assert_eq!(sim.context().fuel.remaining, frozen);
    assert_eq!(sink.logged(FaultKind::FuelSensorFail), 3);
}

#[test]
fn disarming_toggle_clears_live_alert_after_window() {
    let (mut sim, mut sink, mut now) = running(7);
    now += TICK;
    sim.tick(
        &TickInput::at(now).with_toggle(FaultKind::SingleEgtSensorFail, true),
        &mut sink,
    );
    now += TICK;
    sim.tick(
        &TickInput::at(now).with_toggle(FaultKind::SingleEgtSensorFail, false),
        &mut sink,
    );
    assert!(sim.snapshot().right.egt_valid() && sim.snapshot().left.egt_valid());
    assert_eq!(sim.alerts().live().len(), 1);
    for _ in 0..1_000 {
        now += TICK;
        sim.tick(&TickInput::at(now), &mut sink);
    }
    assert!(sim.alerts().live().is_empty());
    assert_eq!(sim.alerts().log().len(), 1);
}
