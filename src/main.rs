//! Headless simulator runner.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Scenario (JSON) ──▶ TickInput per period                │
//! │                                                          │
//! │  SystemClock / ManualClock (Clock)                       │
//! │  LogEventSink + CSV telemetry (EventSink)                │
//! │  ─────────────── Port Trait Boundary ──────────────────  │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │        Simulator (pure logic)                      │  │
//! │  │  FSM · Dynamics · Detector · Alerts                │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Runs a scenario (the built-in demo if none is given) either as fast as
//! possible on simulated time or paced against the wall clock, then prints
//! the permanent fault log.

#![deny(unused_must_use)]

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use turbine_sim::adapters::clock::{ManualClock, SystemClock};
use turbine_sim::adapters::log_sink::LogEventSink;
use turbine_sim::scenario::{Scenario, ScenarioReport};
use turbine_sim::{AppEvent, EventSink, SimConfig, Simulator, TelemetryRecord};

const DEMO_SCENARIO: &str = include_str!("../scenarios/demo.json");

#[derive(Parser, Debug)]
#[command(
    name = "turbine-sim",
    about = "Twin-engine turbine start/run/shutdown simulator"
)]
struct Cli {
    /// Scenario document (JSON).  Runs the built-in demo when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Simulator configuration (JSON).  Missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the noise seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario duration.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Pace ticks against the wall clock instead of simulated time.
    #[arg(long)]
    realtime: bool,

    /// Log every telemetry record.
    #[arg(long)]
    telemetry: bool,

    /// Write telemetry records to this CSV file.
    #[arg(long)]
    telemetry_csv: Option<PathBuf>,
}

/// Forwards to the log sink and keeps telemetry for the CSV file.
struct RunnerSink {
    log: LogEventSink,
    telemetry: Option<Vec<TelemetryRecord>>,
}

impl EventSink for RunnerSink {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        if let (AppEvent::Telemetry(t), Some(rows)) = (event, self.telemetry.as_mut()) {
            rows.push(*t);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<SimConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }

    let mut scenario = match &cli.scenario {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            Scenario::from_json(&text)
                .with_context(|| format!("loading scenario {}", path.display()))?
        }
        None => Scenario::from_json(DEMO_SCENARIO).context("loading built-in demo")?,
    };
    if let Some(duration) = cli.duration_ms {
        scenario.duration_ms = duration;
        scenario.normalize().context("applying --duration-ms")?;
    }

    let mut sim = Simulator::new(config).context("invalid simulator configuration")?;
    let mut sink = RunnerSink {
        log: LogEventSink::new().with_telemetry(cli.telemetry),
        telemetry: cli.telemetry_csv.as_ref().map(|_| Vec::new()),
    };

    let report = if cli.realtime {
        scenario.run(&mut sim, &mut SystemClock::new(), &mut sink)
    } else {
        scenario.run(&mut sim, &mut ManualClock::new(0), &mut sink)
    };

    if let (Some(path), Some(rows)) = (&cli.telemetry_csv, &sink.telemetry) {
        write_csv(path, rows).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} telemetry rows to {}", rows.len(), path.display());
    }

    print_report(&scenario, &report);
    Ok(())
}

fn write_csv(path: &Path, rows: &[TelemetryRecord]) -> std::io::Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    writeln!(out, "{}", TelemetryRecord::CSV_HEADER)?;
    for row in rows {
        writeln!(out, "{}", row.csv_row())?;
    }
    out.flush()
}

fn print_report(scenario: &Scenario, report: &ScenarioReport) {
    let s = &report.snapshot;
    println!("== {} ({} ticks) ==", scenario.name, report.ticks);
    println!(
        "final phase {} | N1 {:.1}/{:.1} | EGT {:.0}/{:.0} | fuel {:.0}",
        s.phase, s.left.n1, s.right.n1, s.left.temperature, s.right.temperature, s.fuel.remaining
    );
    if let Some(severity) = s.worst_severity {
        println!("master {:?}: {} live alert(s)", severity, s.live_alerts.len());
    }
    println!("-- fault log ({} lines) --", report.log.len());
    for line in &report.log {
        println!("{line}");
    }
}
