//! Response decoding.
//!
//! Rocker servers answer with JSON, but proxies and crashed handlers can hand
//! back anything. Decoding either yields a JSON value or a parse error; a body
//! that fails to parse is never reported as empty data. The one exception is
//! `204 No Content`, which always decodes to an empty object.

use regex_lite::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::{Error, ErrorKind, Result};
use crate::transport::RawResponse;

/// How response bodies are parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Parse with `serde_json` directly.
    #[default]
    Strict,
    /// Trim, check the text against a conservative token pattern, and only
    /// then parse it. Rejects anything the pattern does not recognize.
    Permissive,
}

/// A body that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable reason.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::new(err.to_string())
    }
}

static VALID_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\(?:["\\/bfnrt]|u[0-9a-fA-F]{4})"#).unwrap());
static VALID_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""[^"\\\r\n]*"|true|false|null|-?(?:[0-9]+\.)?[0-9]+(?:[eE][+-]?[0-9]+)?"#)
        .unwrap()
});
static VALID_BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|:|,)(?:\s*\[)+").unwrap());
static VALID_RESIDUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\],:{}\s]*$").unwrap());

/// Returns true if `text` only contains JSON-legal tokens and structure.
///
/// Escapes become `@`, literals become `]`, opening brackets after a start,
/// `:` or `,` are dropped; what is left must be brackets, braces, separators
/// and whitespace.
pub fn looks_like_json(text: &str) -> bool {
    let escaped = VALID_ESCAPE.replace_all(text, "@");
    let tokens = VALID_TOKENS.replace_all(&escaped, "]");
    let residue = VALID_BRACES.replace_all(&tokens, "");
    VALID_RESIDUE.is_match(&residue)
}

impl DecodeStrategy {
    /// Decode `text` into a JSON value.
    pub fn decode(&self, text: &str) -> std::result::Result<Value, ParseError> {
        match self {
            DecodeStrategy::Strict => Ok(serde_json::from_str(text)?),
            DecodeStrategy::Permissive => {
                let trimmed = text.trim();
                if !looks_like_json(trimmed) {
                    return Err(ParseError::new("Unable to parse JSON"));
                }
                Ok(serde_json::from_str(trimmed)?)
            }
        }
    }

    /// Decode a raw response, applying the 204 rule.
    pub fn decode_response(&self, raw: RawResponse) -> Result<DecodedResponse> {
        let body = if raw.status() == 204 {
            Value::Object(serde_json::Map::new())
        } else {
            self.decode(raw.body()).map_err(|e| {
                Error::with_source(
                    ErrorKind::Parse {
                        status: raw.status(),
                        message: e.message().to_string(),
                    },
                    e,
                )
            })?
        };

        Ok(DecodedResponse { body, raw })
    }
}

/// Status, decoded body, and the raw response it came from.
#[derive(Debug, Clone)]
pub struct DecodedResponse {
    body: Value,
    raw: RawResponse,
}

impl DecodedResponse {
    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.raw.status()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Returns true for `201 Created`.
    pub fn is_created(&self) -> bool {
        self.status() == 201
    }

    /// Get the decoded body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Take the decoded body.
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Get the raw response.
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    /// Split into (status, decoded body, raw response).
    pub fn into_parts(self) -> (u16, Value, RawResponse) {
        (self.raw.status(), self.body, self.raw)
    }

    /// Deserialize the decoded body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            Error::new(ErrorKind::Parse {
                status: self.status(),
                message: e.to_string(),
            })
        })
    }
}
