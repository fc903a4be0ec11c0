//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements | Connects to             |
//! |------------|------------|-------------------------|
//! | `log_sink` | EventSink  | `log` facade            |
//! | `clock`    | Clock      | `Instant` / manual time |

pub mod clock;
pub mod log_sink;
