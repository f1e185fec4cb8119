//! Rocker REST API client.
//!
//! This client wraps `RockerClient` from `rocker-client` and provides
//! typed methods for the endpoints every Rocker server exposes.

use rocker_client::{ClientConfig, DecodedResponse, ReqwestTransport, RockerClient, Transport};

use crate::error::{Error, Result};

mod file;
mod system;
mod user;

/// Rocker REST API client.
///
/// Provides typed methods for:
/// - Server version and available operations
/// - The current user and user registration
/// - Saving, uploading and removing files
///
/// # Example
///
/// ```rust,ignore
/// use rocker_api::RockerApi;
///
/// let mut api = RockerApi::new("https://rocker.example.com/api")?;
/// println!("server {}", api.server_version().await?);
///
/// api.inner_mut().set_user("me@example.com", "password")?;
/// let me = api.me().await?;
/// ```
pub struct RockerApi<T: Transport = ReqwestTransport> {
    client: RockerClient<T>,
}

impl<T: Transport> Clone for RockerApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for RockerApi<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RockerApi")
            .field("client", &self.client)
            .finish()
    }
}

impl RockerApi<ReqwestTransport> {
    /// Create a new API client for the given base URI.
    pub fn new(base_uri: impl Into<String>) -> Result<Self> {
        let client = RockerClient::new(base_uri)?;
        Ok(Self { client })
    }

    /// Create a new API client with custom HTTP configuration.
    pub fn with_config(base_uri: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let client = RockerClient::with_config(base_uri, config)?;
        Ok(Self { client })
    }

    /// Create an API client from environment variables.
    ///
    /// See [`RockerClient::from_env`].
    pub fn from_env() -> Result<Self> {
        let client = RockerClient::from_env()?;
        Ok(Self { client })
    }
}

impl<T: Transport> RockerApi<T> {
    /// Create an API client from an existing RockerClient.
    pub fn from_client(client: RockerClient<T>) -> Self {
        Self { client }
    }

    /// Get the underlying RockerClient.
    pub fn inner(&self) -> &RockerClient<T> {
        &self.client
    }

    /// Get the underlying RockerClient for changing credentials.
    pub fn inner_mut(&mut self) -> &mut RockerClient<T> {
        &mut self.client
    }

    /// Get the base URI.
    pub fn base_uri(&self) -> &str {
        self.client.base_uri()
    }
}

/// Pass `response` through if it has the expected status.
fn expect_status(response: DecodedResponse, expected: u16) -> Result<DecodedResponse> {
    if response.status() == expected {
        Ok(response)
    } else {
        Err(Error::unexpected_status(
            response.status(),
            response.raw().body(),
        ))
    }
}

/// `GET system/version` payload.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ServerVersion {
    pub version: String,
}

/// Options for [`RockerApi::save_file`].
#[derive(Debug, Clone, Default)]
pub struct SaveFileOptions {
    /// Ask the server to Base64-decode the body before storing it.
    pub base64_decode: bool,
    /// Image versions to generate, as (name, dimensions) pairs.
    pub image_versions: Vec<(String, String)>,
}

impl SaveFileOptions {
    /// Ask the server to Base64-decode the body.
    pub fn with_base64_decode(mut self) -> Self {
        self.base64_decode = true;
        self
    }

    /// Request an image version, e.g. `("thumb", "100x100")`.
    pub fn with_image_version(
        mut self,
        name: impl Into<String>,
        dimensions: impl Into<String>,
    ) -> Self {
        self.image_versions.push((name.into(), dimensions.into()));
        self
    }

    /// Query string for the save request, without the leading `?`.
    pub(crate) fn query(&self) -> String {
        let mut args: Vec<String> = self
            .image_versions
            .iter()
            .map(|(name, dimensions)| {
                format!(
                    "versions[{}]={}",
                    urlencoding::encode(name),
                    urlencoding::encode(dimensions)
                )
            })
            .collect();
        if self.base64_decode {
            args.push("base64_decode=1".to_string());
        }
        args.join("&")
    }
}
