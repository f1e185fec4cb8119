//! # rocker-api
//!
//! Endpoints of a Rocker REST server on top of `rocker-client`.
//!
//! ## Features
//!
//! - **System** - Server version and the list of available operations
//! - **Users** - The authenticated user, and registration that switches the
//!   client to the new account
//! - **Files** - Save (PUT), upload with client-side Base64, and remove
//!
//! ## Example
//!
//! ```rust,ignore
//! use rocker_api::{RockerApi, SaveFileOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rocker_api::Error> {
//!     let mut api = RockerApi::new("https://rocker.example.com/api")?;
//!
//!     let version = api.server_version().await?;
//!     println!("Rocker {version}");
//!
//!     api.create_user("me@example.com", "me", "password", [("city", "Lund")])
//!         .await?;
//!
//!     let file = api
//!         .upload_file(b"hello", "hello.txt", "text/plain", Vec::new())
//!         .await?;
//!     println!("stored as {}", file["name"]);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{RockerApi, SaveFileOptions, ServerVersion};
pub use error::{Error, ErrorKind, Result};
