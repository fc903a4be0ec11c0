//! Scripted scenarios on a manual clock.

use turbine_sim::adapters::clock::ManualClock;
use turbine_sim::app::service::Simulator;
use turbine_sim::config::SimConfig;
use turbine_sim::fault::FaultKind;
use turbine_sim::fsm::Phase;
use turbine_sim::scenario::Scenario;

use super::mock_sink::RecordingSink;

fn run(json: &str, seed: u64) -> (turbine_sim::scenario::ScenarioReport, RecordingSink) {
    let scenario = Scenario::from_json(json).expect("valid scenario");
    let config = SimConfig {
        rng_seed: seed,
        telemetry_every_ticks: 100,
        ..Default::default()
    };
    let mut sim = Simulator::new(config).expect("valid config");
    let mut sink = RecordingSink::new();
    let report = scenario.run(&mut sim, &mut ManualClock::new(0), &mut sink);
    (report, sink)
}

#[test]
fn bundled_demo_runs_to_off() {
    let (report, sink) = run(include_str!("../../scenarios/demo.json"), 1);
    assert_eq!(report.snapshot.phase, Phase::Off);
    assert_eq!(
        sink.phases(),
        vec![Phase::Starting, Phase::Running, Phase::Stopping, Phase::Off]
    );
    assert!(report.log.iter().any(|l| l.ends_with("Over Speed 105")));
    assert_eq!(report.ticks, 26_000 / 5);
}

#[test]
fn bundled_hot_start_never_runs() {
    let (report, sink) = run(include_str!("../../scenarios/hot_start.json"), 2);
    assert!(!sink.phases().contains(&Phase::Running));
    assert_eq!(sink.logged(FaultKind::OverTemp2), 1);
    assert_eq!(report.snapshot.phase, Phase::Off);
}

#[test]
fn bundled_sensor_loss_ends_off() {
    let (report, sink) = run(include_str!("../../scenarios/sensor_loss.json"), 3);
    assert_eq!(sink.logged(FaultKind::SingleN1SensorFail), 1);
    // Still present five seconds later, so written a second time
    assert_eq!(sink.logged(FaultKind::SingleEngineN1TotalFail), 2);
    assert_eq!(sink.logged(FaultKind::AllN1SensorsFail), 1);
    assert_eq!(report.snapshot.phase, Phase::Off);
    assert!(!report.snapshot.left.n1_valid());
}

#[test]
fn telemetry_sampled_by_config() {
    let (report, sink) = run(r#"{ "duration_ms": 1000 }"#, 4);
    assert_eq!(report.ticks, 200);
    assert_eq!(sink.telemetry().len(), 2);
}
