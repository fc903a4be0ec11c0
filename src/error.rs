//! Unified error types for the simulator crate.
//!
//! The simulation core itself never fails: every physical quantity is
//! clamped and every detector returns a classification.  Errors only arise
//! at the edges, when a configuration or scenario is loaded from outside.
//! All variants funnel into [`Error`] so the runner handles them uniformly.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Configuration failed validation.
    Config(ConfigError),
    /// A scenario document could not be parsed.
    Scenario(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Scenario(e) => write!(f, "scenario: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(_) => None,
            Self::Scenario(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`SimConfig::validate`](crate::config::SimConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` names the field and the violated bound.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Scenario(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_field() {
        let e = Error::from(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        assert_eq!(
            e.to_string(),
            "config: validation failed: tick_period_ms must be > 0"
        );
    }

    #[test]
    fn scenario_error_keeps_source() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let e = Error::from(parse);
        assert!(std::error::Error::source(&e).is_some());
        assert!(e.to_string().starts_with("scenario: "));
    }
}
