//! GraphQL-over-HTTP client.
//!
//! Every probe in the scanner goes through [`GraphqlClient::post`]: a
//! JSON-wrapped POST with optional bearer credentials, an explicit
//! per-request timeout, and a uniform [`TransportError`] surface.

use crate::{GraphqlResponse, Result, TransportError};
use std::time::Duration;

/// A thin wrapper over a shared `reqwest` client.
///
/// The underlying client carries no global timeout; each request states
/// its own deadline, since probe classes use different budgets.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
}

impl GraphqlClient {
    /// Creates the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a network error if the TLS backend fails to initialize.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Sends a GraphQL document as `{"query": <document>}`.
    ///
    /// A 2xx response with a JSON body always yields a response
    /// envelope, even when it carries GraphQL errors; everything else
    /// becomes a [`TransportError`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] on deadline expiry,
    /// [`TransportError::Network`] on transport failures,
    /// [`TransportError::Api`]/[`TransportError::Http`] on non-2xx
    /// statuses, and [`TransportError::Other`] on unparseable bodies.
    #[tracing::instrument(skip(self, query), fields(timeout_ms = timeout.as_millis()))]
    pub async fn post(
        &self,
        url: &str,
        query: &str,
        bearer_token: Option<&str>,
        timeout: Duration,
    ) -> Result<GraphqlResponse> {
        let body = serde_json::json!({ "query": query });

        let mut request = self
            .http
            .post(url)
            .timeout(timeout)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(token) = bearer_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let status_text = status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string();
        tracing::debug!(status = status.as_u16(), "Received response");

        let bytes = response.bytes().await.map_err(map_request_error)?;
        let json = serde_json::from_slice::<serde_json::Value>(&bytes);

        if !status.is_success() {
            if let Some(message) = json.as_ref().ok().and_then(extract_error_message) {
                return Err(TransportError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            return Err(TransportError::Http {
                status: status.as_u16(),
                status_text,
            });
        }

        let json = json.map_err(|e| TransportError::Other(e.to_string()))?;
        let mut envelope: GraphqlResponse =
            serde_json::from_value(json).map_err(|e| TransportError::Other(e.to_string()))?;
        envelope.status = status.as_u16();
        Ok(envelope)
    }
}

/// Maps a reqwest failure onto the uniform error surface.
fn map_request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Pulls a usable message out of an error body: `errors[0].message`,
/// then `message`, then `error`.
fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    if let Some(message) = body
        .get("errors")
        .and_then(|e| e.get(0))
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }
    for key in ["message", "error"] {
        if let Some(message) = body.get(key).and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_prefers_graphql_errors() {
        let body = serde_json::json!({
            "errors": [{"message": "boom"}],
            "message": "other"
        });
        assert_eq!(extract_error_message(&body).unwrap(), "boom");
    }

    #[test]
    fn test_extract_error_message_fallbacks() {
        let body = serde_json::json!({"message": "denied"});
        assert_eq!(extract_error_message(&body).unwrap(), "denied");

        let body = serde_json::json!({"error": "nope"});
        assert_eq!(extract_error_message(&body).unwrap(), "nope");

        let body = serde_json::json!({"status": "bad"});
        assert!(extract_error_message(&body).is_none());
    }

    #[tokio::test]
    async fn test_post_returns_envelope_with_errors() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": null, "errors": [{"message": "Forbidden"}]}"#)
            .create_async()
            .await;

        let client = GraphqlClient::new().unwrap();
        let url = format!("{}/graphql", server.url());
        let resp = client
            .post(&url, "query { __typename }", Some("tok"), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert!(!resp.has_data());
        assert_eq!(resp.error_messages(), ["Forbidden"]);
    }

    #[tokio::test]
    async fn test_post_maps_api_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(401)
            .with_body(r#"{"message": "Unauthorized"}"#)
            .create_async()
            .await;

        let client = GraphqlClient::new().unwrap();
        let url = format!("{}/graphql", server.url());
        let err = client
            .post(&url, "query { __typename }", None, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API Error 401: Unauthorized");
    }

    #[tokio::test]
    async fn test_post_maps_bare_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/graphql")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = GraphqlClient::new().unwrap();
        let url = format!("{}/graphql", server.url());
        let err = client
            .post(&url, "query { __typename }", None, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP Error 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_post_network_error_without_response() {
        let client = GraphqlClient::new().unwrap();
        // Port 1 is essentially never listening.
        let err = client
            .post(
                "http://127.0.0.1:1/graphql",
                "query { __typename }",
                None,
                Duration::from_secs(5),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Network Error: "));
    }
}
