//! Application core: orchestration of one simulation tick, zero I/O.
//!
//! The [`service::Simulator`] owns the FSM, the fault detector, the alert
//! aggregator and the shared context.  Everything it emits goes through
//! the [`ports::EventSink`] port, so the core runs unchanged under a
//! presentation layer, the headless runner or a test harness.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
