//! Client configuration.

use crate::admission::AdmissionConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::response::DecodeStrategy;
use std::time::Duration;

/// Where the client runs. Picks the default concurrency ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Desktop or embedded UI: keep the server load from one user low.
    Interactive,
    /// Daemons, jobs and services.
    Server,
}

impl ExecutionContext {
    /// Default maximum number of concurrent requests for this context.
    pub fn default_max_concurrent_requests(self) -> usize {
        match self {
            ExecutionContext::Interactive => 5,
            ExecutionContext::Server => 50,
        }
    }
}

impl std::str::FromStr for ExecutionContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive" | "browser" => Ok(ExecutionContext::Interactive),
            "server" => Ok(ExecutionContext::Server),
            other => Err(Error::new(ErrorKind::Config(format!(
                "unknown execution context '{}'",
                other
            )))),
        }
    }
}

/// Configuration for the dispatcher.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Execution context the defaults were derived from.
    pub context: ExecutionContext,
    /// Maximum number of requests with an outstanding transport call.
    pub max_concurrent_requests: usize,
    /// How to wait when the ceiling is reached.
    pub admission: AdmissionConfig,
    /// How response bodies are parsed.
    pub decode_strategy: DecodeStrategy,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_context(ExecutionContext::Server)
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Defaults for the given execution context.
    pub fn for_context(context: ExecutionContext) -> Self {
        Self {
            context,
            max_concurrent_requests: context.default_max_concurrent_requests(),
            admission: AdmissionConfig::default(),
            decode_strategy: DecodeStrategy::Strict,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `ROCKER_EXECUTION_CONTEXT` (`interactive` or `server`, default: server)
    /// - `ROCKER_MAX_CONCURRENT_REQUESTS`
    /// - `ROCKER_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let context = match std::env::var("ROCKER_EXECUTION_CONTEXT") {
            Ok(value) => value.parse()?,
            Err(_) => ExecutionContext::Server,
        };

        let mut builder = ClientConfigBuilder::for_context(context);

        if let Ok(value) = std::env::var("ROCKER_MAX_CONCURRENT_REQUESTS") {
            let max = value.trim().parse::<usize>().map_err(|e| {
                Error::with_source(
                    ErrorKind::Config(format!("ROCKER_MAX_CONCURRENT_REQUESTS: {}", e)),
                    e,
                )
            })?;
            builder = builder.with_max_concurrent_requests(max);
        }

        if let Ok(value) = std::env::var("ROCKER_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                Error::with_source(ErrorKind::Config(format!("ROCKER_TIMEOUT_SECS: {}", e)), e)
            })?;
            builder = builder.with_timeout(Duration::from_secs(secs));
        }

        builder.try_build()
    }

    /// Check the values that would make the dispatcher unusable.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_requests == 0 {
            return Err(Error::new(ErrorKind::Config(
                "max_concurrent_requests must be at least 1".to_string(),
            )));
        }
        if self.admission.initial_delay.is_zero() {
            return Err(Error::new(ErrorKind::Config(
                "admission delay must be non-zero".to_string(),
            )));
        }
        Ok(())
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Start from the defaults of an execution context.
    pub fn for_context(context: ExecutionContext) -> Self {
        Self {
            config: ClientConfig::for_context(context),
        }
    }

    /// Set the concurrency ceiling.
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.config.max_concurrent_requests = max;
        self
    }

    /// Set the admission deferral configuration.
    pub fn with_admission(mut self, admission: AdmissionConfig) -> Self {
        self.config.admission = admission;
        self
    }

    /// Set the response decode strategy.
    pub fn with_decode_strategy(mut self, strategy: DecodeStrategy) -> Self {
        self.config.decode_strategy = strategy;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }

    /// Build and validate the client configuration.
    pub fn try_build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
