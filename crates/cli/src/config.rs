//! Scan configuration loading.
//!
//! The config document is a JSON object matching [`ScanTarget`]
//! (camelCase keys): required `url` and `userContexts`, optional
//! `schema` and `bolaConfig`.

use anyhow::{bail, Context, Result};
use gqlguard_types::ScanTarget;
use std::collections::HashSet;
use std::path::Path;

/// Loads and validates a scan target from a JSON config file.
pub fn load_target(path: &Path) -> Result<ScanTarget> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let target = parse_target(&contents)
        .with_context(|| format!("Invalid scan config in {}", path.display()))?;
    tracing::info!(
        url = %target.url,
        contexts = target.user_contexts.len(),
        "Scan config loaded"
    );
    Ok(target)
}

fn parse_target(contents: &str) -> Result<ScanTarget> {
    let target: ScanTarget = serde_json::from_str(contents)?;
    validate_target(&target)?;
    Ok(target)
}

fn validate_target(target: &ScanTarget) -> Result<()> {
    if !target.url.starts_with("http://") && !target.url.starts_with("https://") {
        bail!("'url' must be an absolute http(s) endpoint, got '{}'", target.url);
    }
    if target.user_contexts.is_empty() {
        bail!("'userContexts' must contain at least one entry");
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for context in &target.user_contexts {
        if context.id.is_empty() {
            bail!("every user context needs a non-empty 'id'");
        }
        if context.auth_token.is_empty() {
            bail!("user context '{}' needs a non-empty 'authToken'", context.id);
        }
        if !seen.insert(&context.id) {
            bail!("duplicate user context id '{}'", context.id);
        }
    }

    if target.user_contexts.len() < 2 {
        tracing::warn!("Only one user context configured; BOLA checks will be skipped");
    }

    Ok(())
}
