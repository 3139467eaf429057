//! Vulnerability findings produced by the probers.

use crate::Severity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form evidence attached to a finding.
///
/// Serialized as a JSON object at the boundary; typical keys are
/// `query` (the probe document) and `response` (the returned data).
pub type Evidence = serde_json::Map<String, serde_json::Value>;

/// A graded, human-readable observation with optional evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityFinding {
    /// Fresh unique identifier per finding.
    pub id: Uuid,
    pub severity: Severity,
    /// The finding kind, e.g. `"Potencial DoS por Profundidad"`.
    pub title: String,
    pub description: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl VulnerabilityFinding {
    /// Creates a finding with a fresh id and no evidence.
    #[must_use]
    pub fn new(
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            evidence: None,
        }
    }

    /// Attaches an evidence entry, creating the evidence map on first use.
    #[must_use]
    pub fn with_evidence(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.evidence
            .get_or_insert_with(Evidence::new)
            .insert(key.into(), value.into());
        self
    }
}
