//! Broken Object Level Authorization probes.
//!
//! Cross-product of authenticated principals × victim-owned object ids
//! × schema points of interest, deduplicated per (attacker, operation,
//! field, object id). A probe only becomes a finding when foreign data
//! actually comes back; denials of any shape stay silent.

use crate::{CancelToken, ScanError, PROBE_PAUSE};
use gqlguard_analyzer::{build_bola_operation, find_bola_points_of_interest, BolaPointOfInterest, OperationKind};
use gqlguard_introspect::Schema;
use gqlguard_transport::{classify, ErrorClass, GraphqlClient};
use gqlguard_types::{ScanTarget, Severity, UserContext, VulnerabilityFinding};
use std::collections::HashSet;
use std::time::Duration;

const BOLA_TIMEOUT: Duration = Duration::from_secs(15);

const NO_POINTS: &str = "No se encontraron puntos de prueba BOLA";
const NO_POINTS_FOR_TYPES: &str =
    "No se encontraron puntos de prueba BOLA para los tipos especificados";

pub(crate) struct BolaProber<'a> {
    client: &'a GraphqlClient,
    url: &'a str,
}

impl<'a> BolaProber<'a> {
    pub(crate) const fn new(client: &'a GraphqlClient, url: &'a str) -> Self {
        Self { client, url }
    }

    #[tracing::instrument(skip_all)]
    pub(crate) async fn run(
        &self,
        target: &ScanTarget,
        schema: Option<&Schema>,
        findings: &mut Vec<VulnerabilityFinding>,
        cancel: &CancelToken,
    ) -> Result<(), ScanError> {
        if target.user_contexts.len() < 2 {
            tracing::info!("Fewer than two user contexts, skipping BOLA checks");
            return Ok(());
        }
        let Some(schema) = schema else {
            tracing::info!("No schema available, skipping BOLA checks");
            return Ok(());
        };

        let restriction = target.target_object_types();
        let points = find_bola_points_of_interest(schema, restriction);
        if points.is_empty() {
            findings.push(no_points_finding(restriction));
            return Ok(());
        }
        tracing::info!(points = points.len(), "BOLA points of interest discovered");

        let mut tested: HashSet<String> = HashSet::new();
        for attacker in &target.user_contexts {
            for victim in &target.user_contexts {
                if attacker.id == victim.id {
                    continue;
                }
                for point in &points {
                    let object_type = point.object_type();
                    for object_id in victim.owned_ids(&object_type) {
                        let probe_key = format!(
                            "{}-{}-{}-{}",
                            attacker.id, point.operation, point.field_name, object_id
                        );
                        if !tested.insert(probe_key) {
                            continue;
                        }
                        if cancel.is_cancelled() {
                            return Err(ScanError::Cancelled);
                        }

                        self.probe(attacker, victim, point, &object_type, object_id, schema, findings)
                            .await;
                        tokio::time::sleep(PROBE_PAUSE).await;
                    }
                }
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn probe(
        &self,
        attacker: &UserContext,
        victim: &UserContext,
        point: &BolaPointOfInterest,
        object_type: &str,
        object_id: &str,
        schema: &Schema,
        findings: &mut Vec<VulnerabilityFinding>,
    ) {
        let query = build_bola_operation(point, object_id, Some(schema));
        tracing::debug!(
            attacker = %attacker.id,
            victim = %victim.id,
            field = %point.field_name,
            object_id = %object_id,
            "BOLA probe"
        );

        match self
            .client
            .post(self.url, &query, Some(&attacker.auth_token), BOLA_TIMEOUT)
            .await
        {
            Ok(response) => {
                let field_value = response.field_data(&point.field_name);
                let has_field_data = field_value.is_some_and(|v| !v.is_null());
                let messages = response.error_messages();
                let class = classify(response.error_string().as_deref(), &messages, has_field_data);

                if matches!(class, ErrorClass::AuthDenied | ErrorClass::LimitEnforced) {
                    tracing::debug!(field = %point.field_name, "Access correctly denied");
                    return;
                }

                let leaked = match field_value {
                    Some(serde_json::Value::Object(map)) => {
                        map.keys().any(|key| key != "__typename")
                    }
                    Some(serde_json::Value::Array(items)) => !items.is_empty(),
                    _ => false,
                };

                if leaked {
                    let severity = match point.operation {
                        OperationKind::Mutation => Severity::Critical,
                        OperationKind::Query => Severity::High,
                    };
                    tracing::warn!(
                        attacker = %attacker.id,
                        victim = %victim.id,
                        field = %point.field_name,
                        "Cross-principal object access succeeded"
                    );
                    findings.push(
                        VulnerabilityFinding::new(
                            severity,
                            "Posible Vulnerabilidad BOLA",
                            format!(
                                "El usuario '{}' accedió al objeto '{}' (tipo '{}') propiedad de '{}' mediante la operación {} sobre el campo '{}' usando el argumento '{}'.",
                                attacker.id,
                                object_id,
                                object_type,
                                victim.id,
                                point.operation,
                                point.field_name,
                                point.id_arg_name
                            ),
                            "Verifique la propiedad del objeto en cada resolver antes de devolver o modificar datos.",
                        )
                        .with_evidence("query", query.clone())
                        .with_evidence(
                            "response",
                            field_value.cloned().unwrap_or(serde_json::Value::Null),
                        ),
                    );
                } else {
                    tracing::debug!(field = %point.field_name, "Probe inconclusive, no data returned");
                }
            }
            Err(e) => {
                if classify(Some(&e.to_string()), &[], false) == ErrorClass::AuthDenied {
                    tracing::debug!(field = %point.field_name, "Transport-level denial");
                    return;
                }
                findings.push(
                    VulnerabilityFinding::new(
                        Severity::Low,
                        format!("Error Inesperado en Prueba BOLA ({})", point.field_name),
                        format!(
                            "La prueba BOLA sobre el campo '{}' produjo un error inesperado: {e}",
                            point.field_name
                        ),
                        "Revise manualmente el comportamiento del endpoint ante esta consulta.",
                    )
                    .with_evidence("query", query.clone())
                    .with_evidence("error", e.to_string()),
                );
            }
        }
    }
}

fn no_points_finding(restriction: Option<&[String]>) -> VulnerabilityFinding {
    match restriction {
        Some(types) => VulnerabilityFinding::new(
            Severity::Info,
            NO_POINTS_FOR_TYPES,
            format!(
                "El esquema no expone operaciones con argumento de id que devuelvan los tipos especificados: {}.",
                types.join(", ")
            ),
            "Verifique los nombres de tipo configurados en bolaConfig.targetObjectTypes.",
        ),
        None => VulnerabilityFinding::new(
            Severity::Info,
            NO_POINTS,
            "El esquema no expone operaciones de consulta o mutación con argumentos de id sobre las que probar BOLA.",
            "Ninguna acción requerida.",
        ),
    }
}
