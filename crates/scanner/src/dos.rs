//! Denial-of-service amenability probes.
//!
//! Two sub-checks run in order: a depth-7 nested query, then one bare
//! query per candidate list field. Defended responses (limit enforced,
//! access denied) produce no findings.

use crate::{CancelToken, ScanError, PROBE_PAUSE};
use gqlguard_analyzer::{build_deep_query, build_list_query, find_list_fields};
use gqlguard_introspect::Schema;
use gqlguard_transport::{classify, ErrorClass, GraphqlClient};
use gqlguard_types::{Severity, VulnerabilityFinding};
use std::time::Duration;

/// Nesting depth of the depth probe.
const PROBE_DEPTH: usize = 7;

/// Array length above which a list response counts as unpaginated.
const UNPAGINATED_THRESHOLD: usize = 100;

const DEPTH_TIMEOUT: Duration = Duration::from_secs(15);
const LIST_TIMEOUT: Duration = Duration::from_secs(20);

pub(crate) struct DosProber<'a> {
    client: &'a GraphqlClient,
    url: &'a str,
    auth_token: Option<&'a str>,
}

impl<'a> DosProber<'a> {
    pub(crate) const fn new(
        client: &'a GraphqlClient,
        url: &'a str,
        auth_token: Option<&'a str>,
    ) -> Self {
        Self {
            client,
            url,
            auth_token,
        }
    }

    #[tracing::instrument(skip_all)]
    pub(crate) async fn run(
        &self,
        schema: Option<&Schema>,
        findings: &mut Vec<VulnerabilityFinding>,
        cancel: &CancelToken,
    ) -> Result<(), ScanError> {
        self.check_depth(schema, findings, cancel).await?;
        self.check_pagination(schema, findings, cancel).await
    }

    async fn check_depth(
        &self,
        schema: Option<&Schema>,
        findings: &mut Vec<VulnerabilityFinding>,
        cancel: &CancelToken,
    ) -> Result<(), ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let query = build_deep_query(PROBE_DEPTH, schema);
        tracing::debug!(query = %query, "Depth probe");

        match self
            .client
            .post(self.url, &query, self.auth_token, DEPTH_TIMEOUT)
            .await
        {
            Ok(response) if !response.has_errors() => {
                tracing::info!("Server accepted the deep query");
                findings.push(
                    VulnerabilityFinding::new(
                        Severity::Medium,
                        "Potencial DoS por Profundidad",
                        format!(
                            "El servidor aceptó y ejecutó una consulta anidada con profundidad {PROBE_DEPTH} sin aplicar límites de profundidad."
                        ),
                        "Configure un límite máximo de profundidad de consulta en el servidor GraphQL.",
                    )
                    .with_evidence("query", query.clone()),
                );
            }
            Ok(response) => {
                let error = response.error_string();
                let class = classify(
                    error.as_deref(),
                    &response.error_messages(),
                    response.has_data(),
                );
                grade_probe_error(
                    class,
                    "profundidad",
                    &error.unwrap_or_default(),
                    &query,
                    findings,
                );
            }
            Err(e) => {
                let class = classify(Some(&e.to_string()), &[], false);
                grade_probe_error(class, "profundidad", &e.to_string(), &query, findings);
            }
        }

        tokio::time::sleep(PROBE_PAUSE).await;
        Ok(())
    }

    async fn check_pagination(
        &self,
        schema: Option<&Schema>,
        findings: &mut Vec<VulnerabilityFinding>,
        cancel: &CancelToken,
    ) -> Result<(), ScanError> {
        for field in find_list_fields(schema) {
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            let check_name = format!("lista {field}");
            let query = build_list_query(&field, schema);
            tracing::debug!(field = %field, "Pagination probe");

            match self
                .client
                .post(self.url, &query, self.auth_token, LIST_TIMEOUT)
                .await
            {
                Ok(response) => {
                    let messages = response.error_messages();
                    let pagination_enforced = messages.iter().any(|m| {
                        let lowered = m.to_lowercase();
                        lowered.contains("pagination") || lowered.contains("limit")
                    });

                    if pagination_enforced {
                        tracing::debug!(field = %field, "Pagination enforced");
                    } else if let Some(items) =
                        response.field_data(&field).and_then(|d| d.as_array())
                    {
                        if items.len() > UNPAGINATED_THRESHOLD {
                            tracing::info!(field = %field, count = items.len(), "Unpaginated list");
                            findings.push(
                                VulnerabilityFinding::new(
                                    Severity::High,
                                    "Potencial DoS por Falta de Paginación",
                                    format!(
                                        "El campo de lista '{field}' devolvió {} elementos en una sola respuesta sin exigir paginación.",
                                        items.len()
                                    ),
                                    "Imponga paginación obligatoria (first/last o limit/offset) y un tamaño máximo de página.",
                                )
                                .with_evidence("query", query.clone())
                                .with_evidence("itemCount", items.len()),
                            );
                        } else {
                            tracing::debug!(field = %field, count = items.len(), "List size acceptable");
                        }
                    } else {
                        let error = response.error_string();
                        let class = classify(error.as_deref(), &messages, response.has_data());
                        grade_probe_error(
                            class,
                            &check_name,
                            &error.unwrap_or_default(),
                            &query,
                            findings,
                        );
                    }
                }
                Err(e) => {
                    let class = classify(Some(&e.to_string()), &[], false);
                    grade_probe_error(class, &check_name, &e.to_string(), &query, findings);
                }
            }

            tokio::time::sleep(PROBE_PAUSE).await;
        }

        Ok(())
    }
}

/// Applies the common error table: defenses are silent, timeouts are
/// Medium, everything else is Low.
fn grade_probe_error(
    class: ErrorClass,
    check_name: &str,
    detail: &str,
    query: &str,
    findings: &mut Vec<VulnerabilityFinding>,
) {
    match class {
        ErrorClass::LimitEnforced | ErrorClass::AuthDenied => {
            tracing::debug!(check = check_name, ?class, "Probe defended, no finding");
        }
        ErrorClass::Timeout => {
            findings.push(
                VulnerabilityFinding::new(
                    Severity::Medium,
                    format!("Timeout en Chequeo DoS ({check_name})"),
                    format!(
                        "La consulta del chequeo ({check_name}) agotó el tiempo de espera, lo que sugiere procesamiento costoso sin límites: {detail}"
                    ),
                    "Aplique límites de coste o tiempo de ejecución a las consultas.",
                )
                .with_evidence("query", query.to_string())
                .with_evidence("error", detail.to_string()),
            );
        }
        ErrorClass::Network | ErrorClass::Other => {
            findings.push(
                VulnerabilityFinding::new(
                    Severity::Low,
                    format!("Error Inesperado en Chequeo DoS ({check_name})"),
                    format!("La consulta del chequeo ({check_name}) produjo un error inesperado: {detail}"),
                    "Revise manualmente el comportamiento del endpoint ante esta consulta.",
                )
                .with_evidence("query", query.to_string())
                .with_evidence("error", detail.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_probe_error_table() {
        let mut findings = Vec::new();

        grade_probe_error(ErrorClass::LimitEnforced, "profundidad", "", "q", &mut findings);
        grade_probe_error(ErrorClass::AuthDenied, "profundidad", "", "q", &mut findings);
        assert!(findings.is_empty());

        grade_probe_error(
            ErrorClass::Timeout,
            "profundidad",
            "Timeout de la petición",
            "q",
            &mut findings,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].title, "Timeout en Chequeo DoS (profundidad)");

        grade_probe_error(
            ErrorClass::Other,
            "lista users",
            "GraphQL Error: Cannot query field",
            "q",
            &mut findings,
        );
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[1].severity, Severity::Low);
        assert_eq!(
            findings[1].title,
            "Error Inesperado en Chequeo DoS (lista users)"
        );
    }
}
