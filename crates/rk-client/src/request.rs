//! Request descriptors and form encoding.

use bytes::Bytes;
use std::collections::HashMap;
use tracing::debug;

use crate::transport::TransportRequest;

/// Content type for encoded form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP request method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    fn sends_body(&self) -> bool {
        matches!(self, RequestMethod::Post | RequestMethod::Put)
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single form value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Scalar::Number(value.into())
            }
        })*
    };
}

scalar_from_int!(i32, i64, u32, u64, usize);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => Scalar::Number(number),
            None => Scalar::Text(value.to_string()),
        }
    }
}

/// A top-level form entry: a scalar, or one level of named scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Scalar(Scalar),
    Nested(Vec<(String, Scalar)>),
}

macro_rules! form_value_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for FormValue {
            fn from(value: $t) -> Self {
                FormValue::Scalar(value.into())
            }
        })*
    };
}

form_value_from_scalar!(Scalar, &str, String, i32, i64, u32, u64, usize, f64);

impl FormValue {
    /// Build a nested mapping from key/value pairs.
    pub fn nested<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        FormValue::Nested(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Ordered form fields with unique top-level keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any earlier field with the same key.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a nested field, encoded as `key[subkey]=value`.
    pub fn nested<K, V, I>(self, key: impl Into<String>, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.field(key, FormValue::nested(entries))
    }

    /// Insert a field, replacing any earlier field with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Build a form from a JSON object.
    ///
    /// Strings and numbers become scalars, objects and arrays of scalars
    /// become nested fields (arrays keyed by index). Booleans, nulls and
    /// anything nested deeper are skipped without error. A non-object value
    /// yields an empty form.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut form = Self::new();
        let Some(object) = value.as_object() else {
            debug!("Form source is not an object, sending empty form");
            return form;
        };

        for (key, value) in object {
            match value {
                serde_json::Value::Object(children) => {
                    let nested = children
                        .iter()
                        .filter_map(|(k, v)| json_scalar(v).map(|s| (k.clone(), s)));
                    form.insert(key.clone(), FormValue::nested(nested));
                }
                serde_json::Value::Array(items) => {
                    let nested = items
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| json_scalar(v).map(|s| (i.to_string(), s)));
                    form.insert(key.clone(), FormValue::nested(nested));
                }
                other => match json_scalar(other) {
                    Some(scalar) => form.insert(key.clone(), scalar),
                    None => debug!(field = %key, "Skipping non-scalar form field"),
                },
            }
        }

        form
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`.
    ///
    /// Values are percent-encoded; key names are percent-encoded around the
    /// literal brackets of nested fields. Everything outside `A-Z a-z 0-9 - _ . ~`
    /// is escaped, including `! ' ( ) *`, which form decoders read the same
    /// either way.
    pub fn encode(&self) -> String {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            match value {
                FormValue::Scalar(scalar) => pairs.push(format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&scalar.to_string())
                )),
                FormValue::Nested(children) => {
                    for (child, scalar) in children {
                        pairs.push(format!(
                            "{}[{}]={}",
                            urlencoding::encode(key),
                            urlencoding::encode(child),
                            urlencoding::encode(&scalar.to_string())
                        ));
                    }
                }
            }
        }
        pairs.join("&")
    }
}

fn json_scalar(value: &serde_json::Value) -> Option<Scalar> {
    match value {
        serde_json::Value::String(s) => Some(Scalar::Text(s.clone())),
        serde_json::Value::Number(n) => Some(Scalar::Number(n.clone())),
        _ => None,
    }
}

/// Request body content.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Encoded as a URL-encoded form.
    Form(FormData),
    /// Sent verbatim.
    Text(String),
    /// Sent verbatim.
    Bytes(Bytes),
}

/// A request to dispatch, relative to the client's base URI.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: RequestMethod,
    pub(crate) path: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) auth: bool,
}

impl Request {
    /// Create a new request. The path may carry a query string.
    pub fn new(method: RequestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            auth: false,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, path)
    }

    /// Create a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Put, path)
    }

    /// Create a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, path)
    }

    /// Attach the client's credential, if it has one.
    pub fn with_auth(mut self) -> Self {
        self.auth = true;
        self
    }

    /// Add a header. A later value for the same name, compared
    /// case-insensitively, replaces the earlier one.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Set a form body.
    pub fn form(mut self, data: FormData) -> Self {
        self.body = Some(RequestBody::Form(data));
        self
    }

    /// Set a text body, sent as is.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    /// Set a binary body, sent as is.
    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    /// Get the method.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Get the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if the credential should be attached.
    pub fn wants_auth(&self) -> bool {
        self.auth
    }

    /// Turn the descriptor into wire form.
    pub(crate) fn into_transport(self, url: String, authorization: Option<String>) -> TransportRequest {
        let mut headers: Vec<(String, String)> = self.headers.into_iter().collect();
        headers.sort();

        let body = match self.body {
            Some(body) if self.method.sends_body() => match body {
                RequestBody::Form(form) => {
                    headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
                    headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                    Some(Bytes::from(form.encode()))
                }
                RequestBody::Text(text) => Some(Bytes::from(text)),
                RequestBody::Bytes(bytes) => Some(bytes),
            },
            Some(_) => {
                debug!(method = %self.method, "Dropping body on request method without one");
                None
            }
            None => None,
        };

        if self.auth {
            if let Some(value) = authorization {
                headers.retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
                headers.push(("Authorization".to_string(), value));
            }
        }

        TransportRequest {
            method: self.method,
            url,
            headers,
            body,
        }
    }
}
