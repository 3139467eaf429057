//! Scan target and principal definitions.
//!
//! These types mirror the JSON configuration document consumed by the
//! CLI, so a config file deserializes directly into [`ScanTarget`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable description of the endpoint and principals under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTarget {
    /// Absolute HTTP(S) endpoint accepting GraphQL over POST.
    pub url: String,
    /// Optional schema override: inline SDL, a file path, or a URL.
    /// When present, remote introspection is suppressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Principals under test, in order. BOLA probing requires at least two.
    #[serde(default)]
    pub user_contexts: Vec<UserContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bola_config: Option<BolaConfig>,
}

impl ScanTarget {
    /// The first principal, used for connectivity, introspection and
    /// DoS probes.
    #[must_use]
    pub fn primary_context(&self) -> Option<&UserContext> {
        self.user_contexts.first()
    }

    /// The BOLA type restriction, when configured and non-empty.
    #[must_use]
    pub fn target_object_types(&self) -> Option<&[String]> {
        self.bola_config
            .as_ref()
            .and_then(|c| c.target_object_types.as_deref())
            .filter(|types| !types.is_empty())
    }
}

/// A principal under test: a labeled bearer credential plus the object
/// ids that principal legitimately owns, keyed by GraphQL type name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// Opaque internal label, unique within the target.
    pub id: String,
    /// Bearer credential, sent as `Authorization: Bearer <token>`.
    pub auth_token: String,
    #[serde(default)]
    pub owned_object_ids: HashMap<String, Vec<String>>,
}

impl UserContext {
    /// Object ids this principal owns for the given type, if any.
    #[must_use]
    pub fn owned_ids(&self, type_name: &str) -> &[String] {
        self.owned_object_ids
            .get(type_name)
            .map_or(&[], Vec::as_slice)
    }
}

/// Optional restrictions for BOLA probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BolaConfig {
    /// Restrict BOLA points of interest to these return types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_object_types: Option<Vec<String>>,
}
