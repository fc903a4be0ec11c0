//! Twin-engine turbine simulator library.
//!
//! The simulation core (FSM, dynamics, fault detection, alerting) is pure
//! logic with no I/O; it is driven one tick at a time through
//! [`Simulator`] and reports through the [`EventSink`] port.  The runner
//! binary and the integration tests wire it to concrete adapters.

#![deny(unused_must_use)]

pub mod alerts;
pub mod app;
pub mod config;
pub mod detector;
pub mod engine;
pub mod fault;
pub mod fsm;
pub mod scenario;
pub mod toggles;

pub mod error;

pub mod adapters;

pub use app::commands::{Command, FaultToggle, TickInput};
pub use app::events::{AppEvent, Snapshot, TelemetryRecord};
pub use app::ports::{Clock, EventSink};
pub use app::service::Simulator;
pub use config::SimConfig;
pub use error::{Error, Result};
pub use fault::FaultKind;
pub use fsm::Phase;
