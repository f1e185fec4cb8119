//! # rocker
//!
//! Client library for Rocker REST servers.
//!
//! ## Security
//!
//! - Passwords, secrets and tokens are redacted in Debug output
//! - Tracing skips credential parameters
//! - Error bodies have credential tokens redacted and are truncated
//!
//! ## Crates
//!
//! - **rocker-auth** - Credential tokens: plain, Base64 and RC4 schemes
//! - **rocker-client** - Dispatcher with a process-wide in-flight ceiling,
//!   form encoding and tolerant JSON decoding
//! - **rocker-api** - Endpoints: server version, operations, users, files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rocker::RockerApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut api = RockerApi::new("https://rocker.example.com/api")?;
//!     println!("server {}", api.server_version().await?);
//!
//!     api.inner_mut().set_secret("shared-secret")?;
//!     api.inner_mut().set_user("me@example.com", "password")?;
//!     println!("{}", api.me().await?);
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "api")]
pub use rocker_api as api;
#[cfg(feature = "auth")]
pub use rocker_auth as auth;
#[cfg(feature = "client")]
pub use rocker_client as client;

#[cfg(feature = "api")]
pub use rocker_api::{RockerApi, SaveFileOptions};
#[cfg(feature = "auth")]
pub use rocker_auth::{AuthScheme, Authenticator, UserOptions};
#[cfg(feature = "client")]
pub use rocker_client::{ClientConfig, DecodeStrategy, ExecutionContext, Request, RockerClient};
