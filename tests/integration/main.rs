//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  Everything runs on simulated time.

mod fault_injection_tests;
mod mock_sink;
mod scenario_tests;
