//! Response and error classification.
//!
//! Probers route every outcome through [`classify`] before deciding on
//! a finding: defended probes (limit enforcement, denied access) must
//! never be reported as vulnerabilities.

/// Classification of a probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The server enforced a limit (depth, complexity, pagination).
    LimitEnforced,
    /// The server denied access to the probed object.
    AuthDenied,
    /// The probe timed out.
    Timeout,
    /// Transport-layer failure without an HTTP response.
    Network,
    /// Anything else.
    Other,
}

/// Markers indicating a defensive limit in a GraphQL error message.
const LIMIT_MARKERS: &[&str] = &["limit", "complexity", "depth", "pagination"];

/// Markers indicating denied access in a GraphQL error message.
const DENIAL_MARKERS: &[&str] = &["unauthorized", "forbidden", "access denied"];

/// Classifies a probe outcome from its transport error string and/or
/// GraphQL error list.
///
/// `has_data` states whether the response carried non-null data for the
/// probed field; a `"not found"` error with no data classifies as
/// `AuthDenied`. That conflates missing objects with denied access and
/// can hide true positives behind servers that 404 foreign ids, but it
/// is the compatible reading of such responses.
#[must_use]
pub fn classify(error: Option<&str>, graphql_errors: &[String], has_data: bool) -> ErrorClass {
    let lowered: Vec<String> = graphql_errors.iter().map(|m| m.to_lowercase()).collect();

    if lowered
        .iter()
        .any(|m| LIMIT_MARKERS.iter().any(|marker| m.contains(marker)))
    {
        return ErrorClass::LimitEnforced;
    }

    let denied_by_message = lowered
        .iter()
        .any(|m| DENIAL_MARKERS.iter().any(|marker| m.contains(marker)))
        || (!has_data && lowered.iter().any(|m| m.contains("not found")));
    let denied_by_status = error
        .and_then(http_status_of)
        .is_some_and(|status| status == 401 || status == 403);
    if denied_by_message || denied_by_status {
        return ErrorClass::AuthDenied;
    }

    let Some(error) = error else {
        return ErrorClass::Other;
    };
    if error.to_lowercase().contains("timeout") {
        return ErrorClass::Timeout;
    }
    if error.starts_with("Network Error") {
        return ErrorClass::Network;
    }
    ErrorClass::Other
}

/// Reads the status out of `API Error <n>: ...` / `HTTP Error <n>: ...`
/// shaped strings.
fn http_status_of(error: &str) -> Option<u16> {
    let rest = error
        .strip_prefix("API Error ")
        .or_else(|| error.strip_prefix("HTTP Error "))?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
