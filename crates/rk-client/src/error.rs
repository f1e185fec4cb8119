//! Error types for rocker-client.

/// Result type alias for rocker-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rocker-client operations.
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

    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        self.kind.is_transport()
    }

    /// Returns true if a response arrived but its body could not be decoded.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse { .. })
    }

    /// Returns the HTTP status that came with an undecodable body.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Parse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other failure raised by the transport before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not well-formed JSON.
    #[error("Unable to parse JSON (HTTP {status}): {message}")]
    Parse { status: u16, message: String },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential error.
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl ErrorKind {
    /// Returns true if this kind belongs to the transport failure channel.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Transport(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_builder() {
            ErrorKind::InvalidUrl(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

impl From<rocker_auth::Error> for Error {
    fn from(err: rocker_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.kind.to_string()), err)
    }
}
