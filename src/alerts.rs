//! Alert / log aggregator.
//!
//! Turns the per-tick stream of detected faults into two outputs:
//!
//! - a **live list** of [`AlertRecord`]s for display, one per kind, purged
//!   once `display_window_ms` has passed since the kind last triggered;
//! - an append-only **permanent log** of [`LogEntry`] lines
//!   (`<elapsed-ms>ms: <text>`).
//!
//! The two are governed by separate windows.  A re-detection within
//! `dedup_window_ms` of a live record's last trigger is dropped outright.
//! Anything else refreshes (or creates) the live record, and is written to
//! the log only if that kind has not been logged within `log_window_ms`.
//! A fault that stays present is therefore re-logged about once per window
//! instead of once ever.

use core::fmt;

use serde::Serialize;

use crate::config::SimConfig;
use crate::fault::{FaultKind, Severity};

/// A live alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertRecord {
    pub kind: FaultKind,
    pub text: &'static str,
    pub severity: Severity,
    /// Caller clock of the last accepted trigger (ms).
    pub last_trigger_ms: u64,
}

/// One permanent log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the simulation clock origin.
    pub elapsed_ms: u64,
    pub kind: FaultKind,
    pub text: &'static str,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms: {}", self.elapsed_ms, self.text)
    }
}

/// What [`AlertAggregator::submit`] did with a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Within the dedup window of a live record; nothing changed.
    Suppressed,
    /// Existing live record's timestamp refreshed.
    Refreshed,
    /// New live record created.
    Created,
}

pub struct AlertAggregator {
    /// Live records in order of creation.
    live: Vec<AlertRecord>,
    /// Last time each kind was written to the permanent log.
    last_logged: [Option<u64>; FaultKind::COUNT],
    log: Vec<LogEntry>,
    display_window_ms: u64,
    dedup_window_ms: u64,
    log_window_ms: u64,
}

impl AlertAggregator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            live: Vec::new(),
            last_logged: [None; FaultKind::COUNT],
            log: Vec::new(),
            display_window_ms: config.alert_display_window_ms,
            dedup_window_ms: config.alert_dedup_window_ms,
            log_window_ms: config.log_dedup_window_ms,
        }
    }

    /// Accept one detection at `now_ms`.  `elapsed_ms` is the log timestamp.
    ///
    /// Returns the submission outcome and the log line written, if any.
    pub fn submit(
        &mut self,
        kind: FaultKind,
        now_ms: u64,
        elapsed_ms: u64,
    ) -> (Submission, Option<LogEntry>) {
        let outcome = match self.live.iter_mut().find(|r| r.kind == kind) {
            Some(rec) if now_ms.saturating_sub(rec.last_trigger_ms) <= self.dedup_window_ms => {
                return (Submission::Suppressed, None);
            }
            Some(rec) => {
                rec.last_trigger_ms = now_ms;
                Submission::Refreshed
            }
            None => {
                self.live.push(AlertRecord {
                    kind,
                    text: kind.text(),
                    severity: kind.severity(),
                    last_trigger_ms: now_ms,
                });
                Submission::Created
            }
        };

        let slot = &mut self.last_logged[kind.index()];
        let due = slot.is_none_or(|last| now_ms.saturating_sub(last) >= self.log_window_ms);
        if !due {
            return (outcome, None);
        }
        *slot = Some(now_ms);
        let entry = LogEntry {
            elapsed_ms,
            kind,
            text: kind.text(),
        };
        self.log.push(entry.clone());
        (outcome, Some(entry))
    }

    /// Drop live records whose display window has elapsed.
    pub fn purge(&mut self, now_ms: u64) {
        let window = self.display_window_ms;
        self.live
            .retain(|r| now_ms.saturating_sub(r.last_trigger_ms) < window);
    }

    pub fn live(&self) -> &[AlertRecord] {
        &self.live
    }

    /// Every line written so far, oldest first.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Highest severity among the live records.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.live.iter().map(|r| r.severity).max()
    }
}
