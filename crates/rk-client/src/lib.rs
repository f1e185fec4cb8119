//! # rocker-client
//!
//! Core HTTP dispatcher for Rocker REST servers.
//!
//! This crate provides:
//! - A process-wide ceiling on in-flight requests, with deferral instead of
//!   rejection when the ceiling is reached
//! - Credential headers from [`rocker_auth::Authenticator`]
//! - URL-encoded form bodies for POST, verbatim bodies for PUT
//! - Strict or permissive JSON decoding, with `204 No Content` as `{}`
//! - Request/response tracing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (rocker-api endpoints, or your own Request descriptors)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RockerClient                             │
//! │  - Admission against the shared InFlightCounter             │
//! │  - Authorization and content headers                        │
//! │  - Response decoding                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Transport                                │
//! │  - One request in, status + headers + body text out         │
//! │  - ReqwestTransport by default                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use rocker_client::{FormData, Request, RockerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rocker_client::Error> {
//!     let mut client = RockerClient::new("https://rocker.example.com/api")?;
//!     client.set_user("me@example.com", "password")?;
//!
//!     let me = client.dispatch(Request::get("me").with_auth()).await?;
//!     println!("{} {}", me.status(), me.body());
//!
//!     let form = FormData::new().field("nick", "rocker");
//!     client.submit(Request::post("user").form(form), |result| {
//!         println!("{:?}", result.map(|r| r.status()));
//!     });
//!
//!     Ok(())
//! }
//! ```

mod admission;
mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

pub use admission::{
    AdmissionConfig, BackoffStrategy, DeferralSchedule, InFlightCounter, InFlightPermit,
};
pub use client::RockerClient;
pub use config::{ClientConfig, ClientConfigBuilder, ExecutionContext};
pub use error::{Error, ErrorKind, Result};
pub use request::{
    FormData, FormValue, Request, RequestBody, RequestMethod, Scalar, FORM_CONTENT_TYPE,
};
pub use response::{looks_like_json, DecodeStrategy, DecodedResponse, ParseError};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportRequest};

pub use rocker_auth::{AuthScheme, Authenticator, UserOptions};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("rocker-client/", env!("CARGO_PKG_VERSION"));
