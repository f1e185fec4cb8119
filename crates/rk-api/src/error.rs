//! Error types for rocker-api.

/// Result type alias for rocker-api operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rocker-api operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The client or auth error this one wraps, if any.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Build an `UnexpectedStatus` error. The body is sanitized first.
    pub fn unexpected_status(status: u16, body: &str) -> Self {
        Self::new(ErrorKind::UnexpectedStatus {
            status,
            body: sanitize_body(body),
        })
    }

    /// The HTTP status of an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        self.source
            .as_ref()
            .and_then(|s| s.downcast_ref::<rocker_client::Error>())
            .is_some_and(|e| e.is_transport())
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The request failed in rocker-client: transport or undecodable body.
    #[error("Client error: {0}")]
    Client(String),

    /// Credentials could not be built.
    #[error("Auth error: {0}")]
    Auth(String),

    /// The server answered with a status the endpoint does not expect.
    /// The body is sanitized and truncated.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// An argument was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<rocker_client::Error> for Error {
    fn from(err: rocker_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<rocker_auth::Error> for Error {
    fn from(err: rocker_auth::Error) -> Self {
        Error {
            kind: ErrorKind::Auth(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Redact credential tokens and cap the length of a response body.
fn sanitize_body(body: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let token_pattern =
        regex_lite::Regex::new(r"(?i)\b(basic|rc4)\s+[A-Za-z0-9+/]{4,}=*").unwrap();
    let mut sanitized = token_pattern
        .replace_all(body, "$1 [REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
