//! Shared types for the audit pipeline
//!
//! One `CheckResult` is produced per unique `LinkRecord`; the tally groups
//! results by `OutcomeKey`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A (label, URL) pair discovered in the site navigation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Anchor text, or a placeholder when the anchor had none
    pub label: String,
    /// Absolute URL to check
    pub url: String,
}

/// Classified outcome of one reachability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Any non-error status (2xx, 3xx, 403, ...)
    Ok { code: u16 },
    /// HTTP 404
    NotFound { code: u16 },
    /// HTTP 5xx
    ServerError { code: u16 },
    /// Request exceeded the configured timeout
    Timeout,
    /// Transport failure (connection refused, DNS, malformed URL, ...)
    Error { message: String },
}

impl Outcome {
    /// Tally key for this outcome
    pub fn key(&self) -> OutcomeKey {
        match self {
            Outcome::Ok { code } | Outcome::NotFound { code } | Outcome::ServerError { code } => {
                OutcomeKey::Code(*code)
            }
            Outcome::Timeout => OutcomeKey::Timeout,
            Outcome::Error { .. } => OutcomeKey::Error,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok { code } | Outcome::NotFound { code } | Outcome::ServerError { code } => {
                write!(f, "{}", code)
            }
            Outcome::Timeout => write!(f, "timeout"),
            Outcome::Error { .. } => write!(f, "error"),
        }
    }
}

/// Result of checking a single link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub label: String,
    pub url: String,
    pub outcome: Outcome,
}

impl CheckResult {
    /// True for every outcome the report lists as problematic
    pub fn is_problematic(&self) -> bool {
        !matches!(self.outcome, Outcome::Ok { .. })
    }
}

/// Tally key: numeric status codes and sentinels are distinct key spaces.
/// Variant order is the report order: codes ascending, then `error`, then
/// `timeout` (sentinels sort lexicographically after the numeric section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeKey {
    Code(u16),
    Error,
    Timeout,
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKey::Code(code) => write!(f, "{}", code),
            OutcomeKey::Error => write!(f, "error"),
            OutcomeKey::Timeout => write!(f, "timeout"),
        }
    }
}

/// Aggregate counts keyed by outcome; iteration order is the report order
pub type Tally = BTreeMap<OutcomeKey, usize>;
