//! # rocker-auth
//!
//! Credential handling for Rocker REST clients.
//!
//! ## Security
//!
//! - Passwords, secrets and tokens are redacted in Debug output
//! - Tracing never records credential values
//! - The `rc4` scheme is an obfuscation layer expected by Rocker servers,
//!   not encryption; serve Rocker over TLS
//!
//! ## Building blocks
//!
//! - [`text`] - UTF-8 codec between strings and wire bytes
//! - [`encoding`] - padded Base64
//! - [`cipher`] - RC4 keystream
//! - [`Authenticator`] - turns (user, password, optional secret) into a
//!   scheme tag and token
//!
//! ## Example
//!
//! ```rust
//! use rocker_auth::{AuthScheme, Authenticator};
//!
//! let mut auth = Authenticator::new();
//! auth.set_user("a", "b").unwrap();
//! assert_eq!(auth.authorization().as_deref(), Some("basic YTpi"));
//!
//! auth.set_secret("k").unwrap();
//! auth.set_user("a", "b").unwrap();
//! assert_eq!(auth.credential().unwrap().scheme(), &AuthScheme::Rc4);
//! ```

pub mod cipher;
mod credentials;
pub mod encoding;
mod error;
pub mod text;

pub use credentials::{AuthScheme, Authenticator, Credential, UserOptions};
pub use error::{Error, ErrorKind, Result};
