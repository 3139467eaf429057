//! Scan orchestration.

use crate::bola::BolaProber;
use crate::dos::DosProber;
use crate::{CancelToken, ScanError};
use chrono::Utc;
use futures::FutureExt;
use gqlguard_introspect::SchemaFetcher;
use gqlguard_transport::{GraphqlClient, TransportError};
use gqlguard_types::{ScanResult, ScanStatus, ScanTarget, Severity, VulnerabilityFinding};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use uuid::Uuid;

const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECTIVITY_QUERY: &str = "{ __typename }";

const FATAL_TITLE: &str = "Error Fatal Durante el Escaneo";

/// Runs a single scan against the target.
///
/// This is the core's entire API surface: it never fails at the
/// boundary; every failure lands in the result's `status` and `error`.
pub async fn run_scan(target: ScanTarget) -> ScanResult {
    match Scanner::new() {
        Ok(scanner) => scanner.run_scan(target).await,
        Err(e) => connectivity_failure(Uuid::new_v4(), target, &e),
    }
}

/// A reusable scan engine holding one HTTP client.
///
/// Concurrent scans against different targets are independent; the
/// engine keeps no state between runs.
#[derive(Debug)]
pub struct Scanner {
    client: GraphqlClient,
}

impl Scanner {
    /// # Errors
    ///
    /// Fails when the HTTP client (TLS backend) cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            client: GraphqlClient::new()?,
        })
    }

    /// Runs a scan to completion without external cancellation.
    pub async fn run_scan(&self, target: ScanTarget) -> ScanResult {
        self.run_scan_with_cancel(target, &CancelToken::new()).await
    }

    /// Runs a scan, stopping at the next probe boundary once `cancel`
    /// fires. A cancelled scan returns `Failed` with the partial
    /// finding set preserved.
    #[tracing::instrument(skip(self, target, cancel), fields(url = %target.url))]
    pub async fn run_scan_with_cancel(
        &self,
        target: ScanTarget,
        cancel: &CancelToken,
    ) -> ScanResult {
        let scan_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%scan_id, "Starting scan");

        // Connectivity gate: a target we cannot even reach produces an
        // empty, failed result with no findings.
        let token = target.primary_context().map(|ctx| ctx.auth_token.as_str());
        if let Err(e) = self
            .client
            .post(&target.url, CONNECTIVITY_QUERY, token, CONNECTIVITY_TIMEOUT)
            .await
        {
            tracing::warn!(error = %e, "Connectivity check failed");
            let mut result = connectivity_failure(scan_id, target, &e);
            result.started_at = started_at;
            return result;
        }

        let mut findings = Vec::new();
        let outcome = AssertUnwindSafe(self.execute_checks(&target, &mut findings, cancel))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ScanError::Internal(panic_message(panic.as_ref()))));

        let (status, error) = match outcome {
            Ok(()) => {
                tracing::info!(findings = findings.len(), "Scan completed");
                (ScanStatus::Completed, None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Scan failed");
                findings.push(VulnerabilityFinding::new(
                    Severity::Critical,
                    FATAL_TITLE,
                    format!("El escaneo terminó de forma anormal: {e}"),
                    "Revise la configuración del escaneo y el estado del endpoint, y reintente.",
                ));
                (ScanStatus::Failed, Some(e.to_string()))
            }
        };

        ScanResult {
            scan_id,
            target,
            status,
            findings,
            error,
            started_at,
            completed_at: Some(Utc::now()),
        }
    }

    async fn execute_checks(
        &self,
        target: &ScanTarget,
        findings: &mut Vec<VulnerabilityFinding>,
        cancel: &CancelToken,
    ) -> Result<(), ScanError> {
        let schema = SchemaFetcher::new(&self.client)
            .fetch(target, findings)
            .await;
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let token = target.primary_context().map(|ctx| ctx.auth_token.as_str());
        DosProber::new(&self.client, &target.url, token)
            .run(schema.as_ref(), findings, cancel)
            .await?;

        BolaProber::new(&self.client, &target.url)
            .run(target, schema.as_ref(), findings, cancel)
            .await
    }
}

fn connectivity_failure(scan_id: Uuid, target: ScanTarget, cause: &TransportError) -> ScanResult {
    let error = format!(
        "No se pudo conectar a {}. Verifique que el endpoint sea accesible: {cause}",
        target.url
    );
    ScanResult {
        scan_id,
        target,
        status: ScanStatus::Failed,
        findings: Vec::new(),
        error: Some(error),
        started_at: Utc::now(),
        completed_at: Some(Utc::now()),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "pánico no identificado".to_string()
    }
}
