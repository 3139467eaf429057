//! Scan lifecycle status and the sealed scan result.

use crate::{ScanTarget, VulnerabilityFinding};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a scan.
///
/// The core engine only ever returns `Completed` or `Failed`;
/// `Queued` and `Running` exist for embedding job runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "Queued"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// The sealed output of a scan.
///
/// Invariant: when `status` is `Failed`, `error` is set; unless the
/// failure happened before introspection (connectivity), a Critical
/// fatal finding is also present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub scan_id: Uuid,
    pub target: ScanTarget,
    pub status: ScanStatus,
    pub findings: Vec<VulnerabilityFinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScanResult {
    /// True when any finding is High or Critical.
    #[must_use]
    pub fn has_blocking_findings(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_blocking())
    }
}
