//! Error types and HTTP status classification.

/// Result type alias for atomic-sdk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for atomic-sdk operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-usage error. These are raised for caller mistakes
    /// (e.g. neither site id nor domain supplied) before any network call.
    pub fn invalid_usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidUsage(message.into()))
    }

    /// The HTTP status code carried by this error, if any.
    ///
    /// Transport-level failures (connection refused, timeout) have none.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Authentication { status, .. }
            | ErrorKind::InvalidRequest { status, .. }
            | ErrorKind::NotFound { status, .. }
            | ErrorKind::Server { status, .. } => Some(*status),
            ErrorKind::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the remote resource does not exist (HTTP 404).
    ///
    /// Callers branch on this to implement "create if missing" flows.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// Returns true if this error looks like an authentication failure.
    ///
    /// The API reports bad or missing keys as ordinary 401/403 client errors,
    /// so those stay classified as `InvalidRequest`; this helper gives callers
    /// a dedicated branch without changing the classification.
    pub fn is_auth_error(&self) -> bool {
        match &self.kind {
            ErrorKind::Authentication { .. } => true,
            ErrorKind::InvalidRequest { status, .. } => matches!(*status, 401 | 403),
            _ => false,
        }
    }

    /// Returns true if this is a caller-side usage error (no request was sent).
    pub fn is_invalid_usage(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidUsage(_))
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_) | ErrorKind::Timeout)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Authentication failure. Reserved: the classifier maps 401/403 into
    /// `InvalidRequest` to match the API's observed behavior; see
    /// [`Error::is_auth_error`].
    #[error("[{status}] authentication failed: {message}")]
    Authentication { status: u16, message: String },

    /// Client-side request error (HTTP 4xx except 404).
    #[error("[{status}] invalid request: {message}")]
    InvalidRequest { status: u16, message: String },

    /// The requested resource was not found (HTTP 404).
    #[error("[{status}] not found: {message}")]
    NotFound { status: u16, message: String },

    /// Server-side error (HTTP 5xx).
    #[error("[{status}] server error: {message}")]
    Server { status: u16, message: String },

    /// Generic API error: an HTTP failure outside the mapped ranges, or a
    /// failure with no usable status code.
    #[error("API error{}: {message}", status.map(|s| format!(" [{s}]")).unwrap_or_default())]
    Api { status: Option<u16>, message: String },

    /// The request never reached the server or no response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The HTTP request timed out.
    #[error("request timeout")]
    Timeout,

    /// JSON decoding of a success body failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid client configuration (empty API key, bad header value, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller violated the SDK contract; no request was issued.
    #[error("invalid usage: {0}")]
    InvalidUsage(String),
}

/// Map an HTTP failure status and message to the error taxonomy.
///
/// Total over all status codes: `404` is `NotFound`, the rest of `4xx` is
/// `InvalidRequest`, `5xx` is `Server`, and anything else falls through to
/// the generic `Api` kind with the status attached. Never invoked for 2xx
/// responses.
pub fn classify(status: u16, message: impl Into<String>) -> ErrorKind {
    let message = message.into();
    match status {
        404 => ErrorKind::NotFound { status, message },
        400..=499 => ErrorKind::InvalidRequest { status, message },
        500..=599 => ErrorKind::Server { status, message },
        _ => ErrorKind::Api {
            status: Some(status),
            message,
        },
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::Transport(err.to_string())
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_404_is_not_found() {
        let kind = classify(404, "no such site");
        assert!(matches!(kind, ErrorKind::NotFound { status: 404, .. }));
    }

    #[test]
    fn classify_4xx_is_invalid_request() {
        for status in 400..=499u16 {
            if status == 404 {
                continue;
            }
            let kind = classify(status, "bad");
            assert!(
                matches!(kind, ErrorKind::InvalidRequest { .. }),
                "status {status} should classify as InvalidRequest"
            );
        }
    }

    #[test]
    fn classify_5xx_is_server() {
        for status in 500..=599u16 {
            let kind = classify(status, "boom");
            assert!(
                matches!(kind, ErrorKind::Server { .. }),
                "status {status} should classify as Server"
            );
        }
    }

    #[test]
    fn classify_unmapped_is_generic() {
        for status in [100u16, 301, 304, 700] {
            let kind = classify(status, "odd");
            match kind {
                ErrorKind::Api { status: Some(s), .. } => assert_eq!(s, status),
                other => panic!("status {status} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn error_status_accessor() {
        let err = Error::new(classify(404, "gone"));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());

        let err = Error::new(ErrorKind::Transport("connection refused".into()));
        assert_eq!(err.status(), None);
        assert!(err.is_transport_error());
    }

    #[test]
    fn auth_helper_covers_401_and_403() {
        assert!(Error::new(classify(401, "bad key")).is_auth_error());
        assert!(Error::new(classify(403, "forbidden")).is_auth_error());
        assert!(!Error::new(classify(400, "bad request")).is_auth_error());
        assert!(!Error::new(classify(404, "missing")).is_auth_error());
    }

    #[test]
    fn invalid_usage_is_distinct_from_remote_errors() {
        let err = Error::invalid_usage("provide either a site id or a domain");
        assert!(err.is_invalid_usage());
        assert_eq!(err.status(), None);
        assert!(!err.is_transport_error());
    }

    #[test]
    fn display_messages() {
        let cases: Vec<(ErrorKind, &str)> = vec![
            (classify(404, "no such site"), "[404] not found: no such site"),
            (classify(422, "bad domain"), "[422] invalid request: bad domain"),
            (classify(503, "maintenance"), "[503] server error: maintenance"),
            (
                ErrorKind::Api {
                    status: None,
                    message: "mystery".into(),
                },
                "API error: mystery",
            ),
            (ErrorKind::Timeout, "request timeout"),
            (
                ErrorKind::InvalidUsage("missing identifier".into()),
                "invalid usage: missing identifier",
            ),
        ];

        for (kind, expected) in cases {
            let display = kind.to_string();
            assert!(
                display.contains(expected),
                "expected '{display}' to contain '{expected}'"
            );
        }
    }
}
