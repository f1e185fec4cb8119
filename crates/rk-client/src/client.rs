//! The request dispatcher.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use rocker_auth::{Authenticator, UserOptions};

use crate::admission::InFlightCounter;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::Request;
use crate::response::DecodedResponse;
use crate::transport::{ReqwestTransport, Transport};

/// Client for a Rocker server.
///
/// Every request goes through admission control: while the shared in-flight
/// count is at the configured ceiling, new requests wait and re-check on the
/// configured schedule. Once admitted, the request is sent through the
/// [`Transport`] and its body is decoded.
///
/// Cloning is cheap. Clones share the transport, configuration and counter,
/// and carry a snapshot of the credentials.
pub struct RockerClient<T: Transport = ReqwestTransport> {
    base_uri: String,
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    counter: Arc<InFlightCounter>,
    auth: Authenticator,
}

impl<T: Transport> Clone for RockerClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_uri: self.base_uri.clone(),
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            counter: Arc::clone(&self.counter),
            auth: self.auth.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for RockerClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RockerClient")
            .field("base_uri", &self.base_uri)
            .field("max_concurrent_requests", &self.config.max_concurrent_requests)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl RockerClient<ReqwestTransport> {
    /// Create a client for `base_uri` with default configuration.
    pub fn new(base_uri: impl Into<String>) -> Result<Self> {
        Self::with_config(base_uri, ClientConfig::default())
    }

    /// Create a client for `base_uri` with the given configuration.
    pub fn with_config(base_uri: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(base_uri, config, transport)
    }

    /// Create a client from environment variables.
    ///
    /// Required: `ROCKER_BASE_URI`. Configuration is read with
    /// [`ClientConfig::from_env`]. If `ROCKER_USER` is set, credentials are
    /// read with [`Authenticator::from_env`].
    pub fn from_env() -> Result<Self> {
        let base_uri = std::env::var("ROCKER_BASE_URI").map_err(|_| {
            Error::new(ErrorKind::Config(
                "ROCKER_BASE_URI environment variable not set".to_string(),
            ))
        })?;

        let mut client = Self::with_config(base_uri, ClientConfig::from_env()?)?;
        if std::env::var("ROCKER_USER").is_ok() {
            client.auth = Authenticator::from_env()?;
        }
        Ok(client)
    }
}

impl<T: Transport> RockerClient<T> {
    /// Create a client that sends through `transport`.
    ///
    /// The client uses the process-wide in-flight counter.
    pub fn with_transport(
        base_uri: impl Into<String>,
        config: ClientConfig,
        transport: T,
    ) -> Result<Self> {
        let base_uri = base_uri.into();
        url::Url::parse(&base_uri)?;
        config.validate()?;

        Ok(Self {
            base_uri,
            config: Arc::new(config),
            transport: Arc::new(transport),
            counter: InFlightCounter::global(),
            auth: Authenticator::new(),
        })
    }

    /// Count against `counter` instead of the process-wide one.
    pub fn with_counter(mut self, counter: Arc<InFlightCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Use the given credentials.
    pub fn with_authenticator(mut self, auth: Authenticator) -> Self {
        self.auth = auth;
        self
    }

    /// Get the base URI.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the credential state.
    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Last user name given to `set_user`.
    pub fn user(&self) -> Option<&str> {
        self.auth.user()
    }

    /// Number of requests currently in flight on this client's counter.
    pub fn in_flight(&self) -> usize {
        self.counter.in_flight()
    }

    /// Set the shared secret. Must precede `set_user` to take effect.
    pub fn set_secret(&mut self, secret: impl Into<String>) -> Result<()> {
        Ok(self.auth.set_secret(secret)?)
    }

    /// Forget the shared secret. The current credential is kept.
    pub fn clear_secret(&mut self) {
        self.auth.clear_secret();
    }

    /// Set credentials with the default mechanism and encoding.
    pub fn set_user(&mut self, user: &str, pass: &str) -> Result<()> {
        Ok(self.auth.set_user(user, pass)?)
    }

    /// Set credentials with an explicit mechanism or encoding.
    pub fn set_user_with(&mut self, user: &str, pass: &str, options: UserOptions) -> Result<()> {
        Ok(self.auth.set_user_with(user, pass, options)?)
    }

    /// Drop the credential. Requests go out unauthenticated.
    pub fn clear_credentials(&mut self) {
        self.auth.clear_credentials();
    }

    /// Build the full URL for a path.
    ///
    /// Absolute `http://` and `https://` paths are used as they are.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_uri.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    /// Send a request and wait for its decoded response.
    ///
    /// Non-2xx statuses are returned as data. Errors are transport failures
    /// and bodies that are not JSON.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn dispatch(&self, request: Request) -> Result<DecodedResponse> {
        let url = self.url(&request.path);
        let authorization = if request.auth {
            self.auth.authorization()
        } else {
            None
        };
        let wire = request.into_transport(url, authorization);

        let permit = self
            .counter
            .acquire(self.config.max_concurrent_requests, &self.config.admission)
            .await;
        debug!(in_flight = self.counter.in_flight(), "Request admitted");

        let result = self.transport.send(wire).await;
        drop(permit);

        let raw = result.inspect_err(|e| warn!(error = %e, "Transport failed"))?;
        self.config.decode_strategy.decode_response(raw)
    }

    /// Send a request in the background and hand the result to `on_complete`.
    ///
    /// Credentials are the ones held at the time of the call.
    pub fn submit<F>(&self, request: Request, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<DecodedResponse>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let result = client.dispatch(request).await;
            on_complete(result);
        })
    }
}
