//! Severity levels for vulnerability findings.

use serde::{Deserialize, Serialize};

/// Severity of a vulnerability finding.
///
/// The ordering is total: `Critical > High > Medium > Low > Info`.
/// Reports sort findings by descending severity, ties broken by
/// emission order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// Informational observation, not a weakness by itself
    Info,
    /// Weakness with limited impact or low confidence
    Low,
    /// Weakness that degrades service or leaks structure
    Medium,
    /// Confirmed unauthorized read or resource amplification
    High,
    /// Confirmed unauthorized write or full object takeover
    Critical,
}

impl Severity {
    /// Returns true if this severity should fail a CI gate (High or Critical).
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::Info => write!(f, "Info"),
        }
    }
}
