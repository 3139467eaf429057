//! Schema acquisition with introspection-posture findings.

use crate::{parse_sdl, IntrospectError, IntrospectionData, Schema, INTROSPECTION_QUERY};
use gqlguard_transport::GraphqlClient;
use gqlguard_types::{ScanTarget, Severity, VulnerabilityFinding};
use std::path::Path;
use std::time::Duration;

/// Timeout for the introspection request and for schema-override URLs.
const INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(15);

const INTROSPECTION_ENABLED: &str = "Introspection Habilitada";
const INTROSPECTION_WITH_ERRORS: &str = "Introspection Query con Errores";
const INTROSPECTION_DISABLED: &str = "Introspection Deshabilitada o Fallida";

/// Fetches the target schema and records introspection findings.
///
/// A `None` schema is a valid downstream state: the DoS prober falls
/// back to guessed field names and the BOLA prober skips.
#[derive(Debug)]
pub struct SchemaFetcher<'a> {
    client: &'a GraphqlClient,
}

impl<'a> SchemaFetcher<'a> {
    #[must_use]
    pub const fn new(client: &'a GraphqlClient) -> Self {
        Self { client }
    }

    /// Resolves the target's schema.
    ///
    /// When `target.schema` is set, remote introspection is suppressed
    /// and the override is loaded instead; a failing override emits the
    /// same Low finding as a failed introspection and the scan carries
    /// on without a schema.
    #[tracing::instrument(skip(self, target, findings), fields(url = %target.url))]
    pub async fn fetch(
        &self,
        target: &ScanTarget,
        findings: &mut Vec<VulnerabilityFinding>,
    ) -> Option<Schema> {
        if let Some(source) = target.schema.as_deref() {
            tracing::info!("Schema override present, skipping remote introspection");
            return match load_override(source).await {
                Ok(schema) => Some(schema),
                Err(e) => {
                    tracing::warn!(error = %e, "Schema override failed to load");
                    findings.push(disabled_finding(&format!(
                        "El esquema provisto no se pudo cargar: {e}"
                    )));
                    None
                }
            };
        }

        let token = target.primary_context().map(|ctx| ctx.auth_token.as_str());
        let response = match self
            .client
            .post(&target.url, INTROSPECTION_QUERY, token, INTROSPECTION_TIMEOUT)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(error = %e, "Introspection request failed");
                findings.push(disabled_finding(&e.to_string()));
                return None;
            }
        };

        if !response.has_data() {
            let detail = response
                .error_string()
                .unwrap_or_else(|| "la respuesta no contiene datos".to_string());
            tracing::info!(detail = %detail, "Introspection returned no data");
            findings.push(disabled_finding(&detail));
            return None;
        }

        findings.push(VulnerabilityFinding::new(
            Severity::Info,
            INTROSPECTION_ENABLED,
            "El endpoint expone su esquema completo mediante la consulta de introspección.",
            "Deshabilite la introspección en producción o restrinja su acceso a clientes de confianza.",
        ));

        if response.has_errors() {
            findings.push(
                VulnerabilityFinding::new(
                    Severity::Info,
                    INTROSPECTION_WITH_ERRORS,
                    format!(
                        "La introspección devolvió datos acompañados de errores: {}",
                        response.error_messages().join("; ")
                    ),
                    "Verifique que los errores no filtren detalles internos del servidor.",
                )
                .with_evidence("errors", serde_json::Value::from(response.error_messages())),
            );
        }

        let data = response.data.clone()?;
        match serde_json::from_value::<IntrospectionData>(data) {
            Ok(parsed) => {
                let schema = parsed.into_schema();
                tracing::info!(types = schema.types().len(), "Schema parsed");
                Some(schema)
            }
            Err(e) => {
                let e = IntrospectError::Parse(e.to_string());
                tracing::warn!(error = %e, "Introspection data did not parse");
                findings.push(disabled_finding(&e.to_string()));
                None
            }
        }
    }
}

fn disabled_finding(detail: &str) -> VulnerabilityFinding {
    VulnerabilityFinding::new(
        Severity::Low,
        INTROSPECTION_DISABLED,
        format!("No se pudo obtener el esquema del endpoint: {detail}"),
        "Si la introspección está deshabilitada intencionalmente, provea el esquema en la configuración para habilitar las pruebas dependientes del esquema.",
    )
}

/// Resolves a schema override: `http(s)://` URL, existing file path, or
/// inline SDL, in that order.
async fn load_override(source: &str) -> crate::Result<Schema> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::Client::builder()
            .timeout(INTROSPECTION_TIMEOUT)
            .build()
            .map_err(|e| IntrospectError::Load(e.to_string()))?;
        let body = client
            .get(source)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| IntrospectError::Load(e.to_string()))?
            .text()
            .await
            .map_err(|e| IntrospectError::Load(e.to_string()))?;
        return parse_sdl(&body);
    }

    if Path::new(source).is_file() {
        let contents =
            std::fs::read_to_string(source).map_err(|e| IntrospectError::Load(e.to_string()))?;
        return parse_sdl(&contents);
    }

    parse_sdl(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn target(url: &str) -> ScanTarget {
        serde_json::from_value(serde_json::json!({
            "url": url,
            "userContexts": [
                {"id": "a", "authToken": "tok-a", "ownedObjectIds": {}}
            ]
        }))
        .unwrap()
    }

    const MINIMAL_INTROSPECTION: &str = r#"{
        "data": {
            "__schema": {
                "queryType": {"name": "Query"},
                "mutationType": null,
                "types": [
                    {"kind": "OBJECT", "name": "Query", "fields": [
                        {"name": "ping", "args": [], "type": {"kind": "SCALAR", "name": "String", "ofType": null}}
                    ]}
                ]
            }
        }
    }"#;

    #[tokio::test]
    async fn test_fetch_success_emits_enabled_finding() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("IntrospectionQuery".into()))
            .with_status(200)
            .with_body(MINIMAL_INTROSPECTION)
            .create_async()
            .await;

        let client = GraphqlClient::new().unwrap();
        let fetcher = SchemaFetcher::new(&client);
        let mut findings = Vec::new();
        let url = format!("{}/graphql", server.url());

        let schema = fetcher.fetch(&target(&url), &mut findings).await;

        assert!(schema.is_some());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, INTROSPECTION_ENABLED);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_fetch_http_error_emits_disabled_finding() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(500)
            .with_body("nope")
            .create_async()
            .await;

        let client = GraphqlClient::new().unwrap();
        let fetcher = SchemaFetcher::new(&client);
        let mut findings = Vec::new();
        let url = format!("{}/graphql", server.url());

        let schema = fetcher.fetch(&target(&url), &mut findings).await;

        assert!(schema.is_none());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, INTROSPECTION_DISABLED);
        assert_eq!(findings[0].severity, Severity::Low);
        assert!(findings[0].description.contains("HTTP Error 500"));
    }

    #[tokio::test]
    async fn test_fetch_data_with_errors_emits_both_info_findings() {
        let body = r#"{
            "data": {
                "__schema": {
                    "queryType": {"name": "Query"},
                    "mutationType": null,
                    "types": [{"kind": "OBJECT", "name": "Query", "fields": []}]
                }
            },
            "errors": [{"message": "partial"}]
        }"#;
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = GraphqlClient::new().unwrap();
        let fetcher = SchemaFetcher::new(&client);
        let mut findings = Vec::new();
        let url = format!("{}/graphql", server.url());

        let schema = fetcher.fetch(&target(&url), &mut findings).await;

        assert!(schema.is_some());
        let titles: Vec<_> = findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            [INTROSPECTION_ENABLED, INTROSPECTION_WITH_ERRORS]
        );
    }

    #[tokio::test]
    async fn test_inline_sdl_override_suppresses_introspection() {
        // No mock server: any network call would fail the test.
        let mut t = target("http://127.0.0.1:1/graphql");
        t.schema = Some("type Query { ping: String }".to_string());

        let client = GraphqlClient::new().unwrap();
        let fetcher = SchemaFetcher::new(&client);
        let mut findings = Vec::new();

        let schema = fetcher.fetch(&t, &mut findings).await;

        assert!(schema.is_some());
        assert!(findings.is_empty());
        assert!(schema.unwrap().query_root().unwrap().field("ping").is_some());
    }

    #[tokio::test]
    async fn test_broken_override_emits_disabled_finding() {
        let mut t = target("http://127.0.0.1:1/graphql");
        t.schema = Some("type { broken".to_string());

        let client = GraphqlClient::new().unwrap();
        let fetcher = SchemaFetcher::new(&client);
        let mut findings = Vec::new();

        let schema = fetcher.fetch(&t, &mut findings).await;

        assert!(schema.is_none());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, INTROSPECTION_DISABLED);
    }
}
