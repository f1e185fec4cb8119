//! Error types for rocker-auth.
//!
//! Error messages never include passwords, secrets or tokens.

/// Result type alias for rocker-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rocker-auth operations.
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

    /// Returns true if this error was caused by an empty cipher key.
    pub fn is_empty_key(&self) -> bool {
        matches!(self.kind, ErrorKind::EmptyKey)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The RC4 cipher was given a zero-length key.
    #[error("Cipher key must not be empty")]
    EmptyKey,

    /// Input was not valid Base64.
    #[error("Invalid Base64 input: {0}")]
    InvalidEncoding(String),

    /// Bytes were not valid UTF-8 text.
    #[error("Invalid UTF-8 text: {0}")]
    InvalidText(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::with_source(ErrorKind::InvalidEncoding(err.to_string()), err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::with_source(ErrorKind::InvalidText(err.to_string()), err)
    }
}
