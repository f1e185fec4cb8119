//! The single-request primitive the dispatcher runs on.
//!
//! The dispatcher only needs "send one request, get status, headers and body
//! text back". [`ReqwestTransport`] is the default; tests and embedders can
//! supply their own [`Transport`].

use bytes::Bytes;
use std::future::Future;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestMethod;

/// A request in wire form.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl RawResponse {
    /// Build a raw response. Header names are stored lower-cased.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            body: body.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All headers, names lower-cased.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// The body text exactly as received.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Sends one HTTP request.
///
/// Failures before a response arrives are reported as errors whose kind
/// satisfies [`ErrorKind::is_transport`]. Any status code, including 4xx and
/// 5xx, is a successful send.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: TransportRequest) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    enable_tracing: bool,
}

impl ReqwestTransport {
    /// Build a transport honoring the timeouts and User-Agent in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            enable_tracing: config.enable_tracing,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if self.enable_tracing {
            debug!(method = %request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;
        let status = response.status().as_u16();

        if self.enable_tracing {
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.text().await?;
        Ok(RawResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_raw_response_header_lookup() {
        let raw = RawResponse::new(
            200,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            "{}",
        );
        assert_eq!(raw.content_type(), Some("application/json"));
        assert_eq!(raw.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(raw.header("etag"), None);
    }

    #[tokio::test]
    async fn test_sends_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user"))
            .and(header("Authorization", "basic YTpi"))
            .and(body_string("nick=rocker"))
            .respond_with(ResponseTemplate::new(201).set_body_string("{\"id\":1}"))
            .mount(&mock_server)
            .await;

        let response = transport()
            .send(TransportRequest {
                method: RequestMethod::Post,
                url: format!("{}/user", mock_server.uri()),
                headers: vec![("Authorization".to_string(), "basic YTpi".to_string())],
                body: Some(Bytes::from_static(b"nick=rocker")),
            })
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.body(), "{\"id\":1}");
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&mock_server)
            .await;

        let response = transport()
            .send(TransportRequest {
                method: RequestMethod::Get,
                url: format!("{}/missing", mock_server.uri()),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(response.body(), "nope");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop a listener to get a port nobody is serving.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let err = transport()
            .send(TransportRequest {
                method: RequestMethod::Get,
                url: format!("http://{}/", addr),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap_err();

        assert!(err.is_transport(), "unexpected error: {err}");
    }
}
