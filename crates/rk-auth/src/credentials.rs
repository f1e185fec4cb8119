//! Credential tokens for the `Authorization` header.
//!
//! All credential types implement custom Debug to redact sensitive data.

use tracing::debug;

use crate::cipher;
use crate::encoding;
use crate::error::{Error, ErrorKind, Result};
use crate::text;

/// Scheme tag placed in front of the token in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `basic`, the default.
    Basic,
    /// `rc4`, forced whenever a shared secret is configured.
    Rc4,
    /// Any other caller-supplied mechanism name.
    Custom(String),
}

impl AuthScheme {
    /// Parse a mechanism name. Only the exact tags `basic` and `rc4` map to
    /// the known schemes; any other spelling is kept as given.
    pub fn from_mechanism(mechanism: &str) -> Self {
        match mechanism {
            "basic" => AuthScheme::Basic,
            "rc4" => AuthScheme::Rc4,
            _ => AuthScheme::Custom(mechanism.to_string()),
        }
    }

    /// The tag as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            AuthScheme::Basic => "basic",
            AuthScheme::Rc4 => "rc4",
            AuthScheme::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheme tag and its encoded token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    scheme: AuthScheme,
    token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("scheme", &self.scheme)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    /// Build a credential from an already encoded token.
    pub fn new(scheme: AuthScheme, token: impl Into<String>) -> Self {
        Self {
            scheme,
            token: token.into(),
        }
    }

    /// Get the scheme tag.
    pub fn scheme(&self) -> &AuthScheme {
        &self.scheme
    }

    /// Get the encoded token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for the `Authorization` header: `"<scheme> <token>"`.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.token)
    }
}

/// Options for [`Authenticator::set_user_with`].
#[derive(Debug, Clone)]
pub struct UserOptions {
    /// Mechanism name; `None` means `basic`. Ignored when a secret is set.
    pub mechanism: Option<String>,
    /// Whether to Base64-encode a plain `user:pass` token. Tokens produced
    /// with a secret are always encoded.
    pub encode: bool,
}

impl Default for UserOptions {
    fn default() -> Self {
        Self {
            mechanism: None,
            encode: true,
        }
    }
}

impl UserOptions {
    /// Use the given mechanism name.
    pub fn with_mechanism(mut self, mechanism: impl Into<String>) -> Self {
        self.mechanism = Some(mechanism.into());
        self
    }

    /// Send the plain token without Base64 encoding.
    pub fn without_encoding(mut self) -> Self {
        self.encode = false;
        self
    }
}

/// Holds the shared secret and the current credential of one client.
///
/// `set_secret` only affects credentials computed afterwards, so it has to be
/// called before `set_user`.
#[derive(Clone, Default)]
pub struct Authenticator {
    secret: Option<String>,
    user: Option<String>,
    credential: Option<Credential>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("credential", &self.credential)
            .finish()
    }
}

impl Authenticator {
    /// Create an unauthenticated instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load credentials from environment variables.
    ///
    /// Required:
    /// - `ROCKER_USER`
    /// - `ROCKER_PASSWORD`
    ///
    /// Optional:
    /// - `ROCKER_SECRET` (switches to the `rc4` scheme)
    /// - `ROCKER_AUTH_MECHANISM` (default: "basic")
    pub fn from_env() -> Result<Self> {
        let user = std::env::var("ROCKER_USER")
            .map_err(|e| Error::with_source(ErrorKind::EnvVar("ROCKER_USER".to_string()), e))?;
        let pass = std::env::var("ROCKER_PASSWORD").map_err(|e| {
            Error::with_source(ErrorKind::EnvVar("ROCKER_PASSWORD".to_string()), e)
        })?;

        let mut auth = Self::new();
        if let Ok(secret) = std::env::var("ROCKER_SECRET") {
            auth.set_secret(secret)?;
        }

        let mut options = UserOptions::default();
        if let Ok(mechanism) = std::env::var("ROCKER_AUTH_MECHANISM") {
            options = options.with_mechanism(mechanism);
        }

        auth.set_user_with(&user, &pass, options)?;
        Ok(auth)
    }

    /// Configure the shared secret used to obscure subsequent credentials.
    pub fn set_secret(&mut self, secret: impl Into<String>) -> Result<()> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::new(ErrorKind::EmptyKey));
        }
        self.secret = Some(secret);
        Ok(())
    }

    /// Forget the shared secret. The current credential is left as is.
    pub fn clear_secret(&mut self) {
        self.secret = None;
    }

    /// Returns true if a shared secret is configured.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Set the user with default options (`basic`, Base64-encoded).
    pub fn set_user(&mut self, user: &str, pass: &str) -> Result<()> {
        self.set_user_with(user, pass, UserOptions::default())
    }

    /// Compute and store the credential for `user` / `pass`.
    pub fn set_user_with(&mut self, user: &str, pass: &str, options: UserOptions) -> Result<()> {
        let pair = text::encode(&format!("{}:{}", user, pass));

        let credential = match &self.secret {
            Some(secret) => {
                let sealed = cipher::encrypt(&text::encode(secret), &pair)?;
                Credential::new(AuthScheme::Rc4, encoding::encode(sealed))
            }
            None => {
                let scheme = options
                    .mechanism
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .map(AuthScheme::from_mechanism)
                    .unwrap_or(AuthScheme::Basic);
                let token = if options.encode {
                    encoding::encode(&pair)
                } else {
                    format!("{}:{}", user, pass)
                };
                Credential::new(scheme, token)
            }
        };

        debug!(scheme = %credential.scheme(), "Credential updated");
        self.user = Some(user.to_string());
        self.credential = Some(credential);
        Ok(())
    }

    /// Drop the user and credential. The secret is kept.
    pub fn clear_credentials(&mut self) {
        self.user = None;
        self.credential = None;
    }

    /// Get the last user name passed to `set_user`.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Get the current credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Value for the `Authorization` header, if a credential is set.
    pub fn authorization(&self) -> Option<String> {
        self.credential.as_ref().map(Credential::header_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_without_secret() {
        let mut auth = Authenticator::new();
        auth.set_user("a", "b").unwrap();

        let cred = auth.credential().unwrap();
        assert_eq!(cred.scheme(), &AuthScheme::Basic);
        assert_eq!(encoding::decode(cred.token()).unwrap(), b"a:b");
        assert_eq!(auth.authorization().unwrap(), "basic YTpi");
        assert_eq!(auth.user(), Some("a"));
    }

    #[test]
    fn test_secret_forces_rc4() {
        let mut auth = Authenticator::new();
        auth.set_secret("k").unwrap();
        auth.set_user_with("a", "b", UserOptions::default().with_mechanism("digest"))
            .unwrap();

        let cred = auth.credential().unwrap();
        assert_eq!(cred.scheme(), &AuthScheme::Rc4);

        let sealed = encoding::decode(cred.token()).unwrap();
        let plain = cipher::decrypt(b"k", &sealed).unwrap();
        assert_eq!(plain, b"a:b");
    }

    #[test]
    fn test_secret_token_is_always_encoded() {
        let mut auth = Authenticator::new();
        auth.set_secret("k").unwrap();
        auth.set_user_with("a", "b", UserOptions::default().without_encoding())
            .unwrap();

        let token = auth.credential().unwrap().token().to_string();
        assert_eq!(token.len() % 4, 0);
        assert!(encoding::decode(&token).is_ok());
    }

    #[test]
    fn test_secret_after_user_has_no_effect_until_recomputed() {
        let mut auth = Authenticator::new();
        auth.set_user("a", "b").unwrap();
        auth.set_secret("k").unwrap();
        assert_eq!(auth.credential().unwrap().scheme(), &AuthScheme::Basic);

        auth.set_user("a", "b").unwrap();
        assert_eq!(auth.credential().unwrap().scheme(), &AuthScheme::Rc4);
    }

    #[test]
    fn test_plain_token_without_encoding() {
        let mut auth = Authenticator::new();
        auth.set_user_with("a", "b", UserOptions::default().without_encoding())
            .unwrap();
        assert_eq!(auth.authorization().unwrap(), "basic a:b");
    }

    #[test]
    fn test_custom_mechanism() {
        let mut auth = Authenticator::new();
        auth.set_user_with("a", "b", UserOptions::default().with_mechanism("Token"))
            .unwrap();
        assert_eq!(
            auth.credential().unwrap().scheme(),
            &AuthScheme::Custom("Token".to_string())
        );
        assert!(auth.authorization().unwrap().starts_with("Token "));
    }

    #[test]
    fn test_mechanism_spelling_is_kept() {
        assert_eq!(AuthScheme::from_mechanism("basic"), AuthScheme::Basic);
        assert_eq!(AuthScheme::from_mechanism("rc4"), AuthScheme::Rc4);
        assert_eq!(AuthScheme::from_mechanism("RC4").as_str(), "RC4");

        let mut auth = Authenticator::new();
        auth.set_user_with("a", "b", UserOptions::default().with_mechanism("Basic"))
            .unwrap();
        assert_eq!(auth.authorization().unwrap(), "Basic YTpi");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut auth = Authenticator::new();
        let err = auth.set_secret("").unwrap_err();
        assert!(err.is_empty_key());
        assert!(!auth.has_secret());
    }

    #[test]
    fn test_clear_credentials_keeps_secret() {
        let mut auth = Authenticator::new();
        auth.set_secret("k").unwrap();
        auth.set_user("a", "b").unwrap();
        auth.clear_credentials();

        assert!(auth.credential().is_none());
        assert!(auth.user().is_none());
        assert!(auth.has_secret());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut auth = Authenticator::new();
        auth.set_secret("topsecret").unwrap();
        auth.set_user("alice", "hunter2").unwrap();

        let debug = format!("{:?}", auth);
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains(auth.credential().unwrap().token()));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_non_ascii_credentials_round_trip() {
        let mut auth = Authenticator::new();
        auth.set_secret("clé").unwrap();
        auth.set_user("jürgen", "pässwörd").unwrap();

        let sealed = encoding::decode(auth.credential().unwrap().token()).unwrap();
        let plain = cipher::decrypt(&text::encode("clé"), &sealed).unwrap();
        assert_eq!(text::decode(&plain).unwrap(), "jürgen:pässwörd");
    }
}
