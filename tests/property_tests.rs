//! Property tests: random pilot commands and instructor toggles never
//! drive the simulator out of its physical and display envelopes.

use proptest::prelude::*;
use turbine_sim::app::commands::{Command, TickInput};
use turbine_sim::app::service::Simulator;
use turbine_sim::engine::{EGT_DISPLAY_MAX, EGT_DISPLAY_MIN, FUEL_CAPACITY, N1_DISPLAY_MAX};
use turbine_sim::fault::FaultKind;
use turbine_sim::fsm::Phase;

#[derive(Debug, Clone)]
enum Op {
    Idle(u16),
    Command(Command),
    Toggle(usize, bool),
    ClockJump(u64),
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Stop),
        Just(Command::ThrustUp),
        Just(Command::ThrustDown),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u16..400).prop_map(Op::Idle),
        3 => command().prop_map(Op::Command),
        2 => (0..FaultKind::COUNT, any::<bool>()).prop_map(|(i, a)| Op::Toggle(i, a)),
        1 => (0u64..50).prop_map(Op::ClockJump),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn state_stays_within_envelope(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..40)) {
        let mut sim = Simulator::with_seed(seed);
        let mut sink = Vec::new();
        let mut now = 0u64;
        sim.start(now, &mut sink);

        for op in ops {
            let mut inputs = Vec::new();
            match op {
                Op::Idle(n) => {
                    for _ in 0..n {
                        now += 5;
                        inputs.push(TickInput::at(now));
                    }
                }
                Op::Command(c) => {
                    now += 5;
                    inputs.push(TickInput::at(now).with_command(c));
                }
                Op::Toggle(i, armed) => {
                    now += 5;
                    inputs.push(TickInput::at(now).with_toggle(FaultKind::ALL[i], armed));
                }
                Op::ClockJump(ms) => {
                    now += ms;
                    inputs.push(TickInput::at(now));
                }
            }

            for input in &inputs {
                let snap = sim.tick(input, &mut sink);
                let ctx = sim.context();

                prop_assert_eq!(ctx.phase, snap.phase);
                prop_assert!(ctx.engines.left.n1 >= 0.0 && ctx.engines.right.n1 >= 0.0);
                prop_assert!(ctx.engines.left.fuel_flow >= 0.0 && ctx.engines.right.fuel_flow >= 0.0);
                prop_assert!((0.0..=FUEL_CAPACITY).contains(&ctx.fuel.remaining));

                for e in [&snap.left, &snap.right] {
                    prop_assert!((0.0..=N1_DISPLAY_MAX).contains(&e.n1));
                    prop_assert!((EGT_DISPLAY_MIN..=EGT_DISPLAY_MAX).contains(&e.temperature));
                }

                prop_assert_eq!(ctx.stopping.is_some(), snap.phase == Phase::Stopping);
                if snap.phase != Phase::Running {
                    prop_assert!(!ctx.thrust.is_pending());
                }
                if snap.phase == Phase::Off {
                    prop_assert!(!snap.run_light_on && !snap.start_light_on);
                }
                prop_assert!(snap.live_alerts.len() <= FaultKind::COUNT);
            }
        }
    }

    #[test]
    fn same_seed_same_trajectory(seed in any::<u64>(), ticks in 100usize..1_600) {
        let run = |seed: u64| {
            let mut sim = Simulator::with_seed(seed);
            let mut sink = Vec::new();
            sim.tick(&TickInput::at(5).with_command(Command::Start), &mut sink);
            for i in 0..ticks as u64 {
                sim.tick(&TickInput::at(10 + i * 5), &mut sink);
            }
            sim.telemetry()
        };
        prop_assert_eq!(run(seed), run(seed));
    }
}
