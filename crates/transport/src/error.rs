use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

/// Uniform error value surfaced by the transport.
///
/// The `Display` strings are part of the scanner's contract: they are
/// embedded verbatim in findings and fed to the error classifier, so
/// their shapes must stay stable.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request exceeded its deadline. The rendered marker is the
    /// canonical timeout string recognized by the classifier.
    #[error("Timeout de la petición")]
    Timeout,

    /// Transport-layer failure without an HTTP response.
    #[error("Network Error: {0}")]
    Network(String),

    /// Non-2xx response whose body carried a usable error message.
    #[error("API Error {status}: {message}")]
    Api { status: u16, message: String },

    /// Non-2xx response without a parseable body.
    #[error("HTTP Error {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Anything else; rendered bare, as a fallback message.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// The HTTP status carried by this error, when there is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shapes() {
        assert_eq!(TransportError::Timeout.to_string(), "Timeout de la petición");
        assert_eq!(
            TransportError::Network("connection refused".into()).to_string(),
            "Network Error: connection refused"
        );
        assert_eq!(
            TransportError::Api {
                status: 401,
                message: "Unauthorized".into()
            }
            .to_string(),
            "API Error 401: Unauthorized"
        );
        assert_eq!(
            TransportError::Http {
                status: 500,
                status_text: "Internal Server Error".into()
            }
            .to_string(),
            "HTTP Error 500: Internal Server Error"
        );
        assert_eq!(
            TransportError::Other("boom".into()).to_string(),
            "boom"
        );
    }

    #[test]
    fn test_status_extraction() {
        let api = TransportError::Api {
            status: 403,
            message: "Forbidden".into(),
        };
        assert_eq!(api.status(), Some(403));
        assert_eq!(TransportError::Timeout.status(), None);
    }
}
