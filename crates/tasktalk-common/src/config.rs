//! Credentials and client configuration.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};

/// An OAuth2 client-credentials pair.
///
/// Immutable for the lifetime of the owning client. The secret is stored as a
/// [`SecretString`] so it never shows up in debug output or logs; the pair
/// only ever leaves this type as the encoded basic-auth value.
///
/// # Examples
///
/// ```
/// use tasktalk_common::Credentials;
///
/// let credentials = Credentials::new("id1", "secret1");
/// assert_eq!(credentials.basic_auth(), "Basic aWQxOnNlY3JldDE=");
/// ```
#[derive(Clone)]
pub struct Credentials {
    /// The OAuth2 client identifier.
    pub client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    /// Creates a credentials pair.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into().into()),
        }
    }

    /// Encodes the pair into a single authorization header value:
    /// `Basic base64(client_id:client_secret)`.
    #[must_use]
    pub fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret.expose_secret());
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Default model identifier for completion requests.
pub const DEFAULT_MODEL: &str = "GigaChat";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Configuration for a [`GigaChatClient`](https://docs.rs/tasktalk-client).
///
/// Both base URLs point at forwarding-proxy paths rather than the upstream
/// hosts directly; the auth URL serves token issuance, the api URL serves
/// models and completions. Configuration is an explicit value passed to the
/// client constructor; the library never reads the process environment.
///
/// # Examples
///
/// ```
/// use tasktalk_common::{ClientConfig, Credentials};
///
/// let config = ClientConfig::new(
///     Credentials::new("id", "secret"),
///     "http://127.0.0.1:8010/auth-proxy",
///     "http://127.0.0.1:8010/api-proxy",
/// )
/// .with_timeout(30);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The client-credentials pair used for token acquisition.
    pub credentials: Credentials,
    /// Base URL for the token-issuance forwarding path.
    pub auth_base_url: String,
    /// Base URL for the models/completions forwarding path.
    pub api_base_url: String,
    /// Model identifier sent with completion requests.
    pub model: String,
    /// Sampling temperature sent with completion requests.
    pub temperature: f32,
    /// Maximum completion tokens sent with completion requests.
    pub max_tokens: u32,
    /// Request timeout in seconds. `None` means no timeout.
    pub timeout_seconds: Option<u64>,
}

impl ClientConfig {
    /// Creates a configuration with the default model and sampling settings.
    pub fn new(
        credentials: Credentials,
        auth_base_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            auth_base_url: auth_base_url.into(),
            api_base_url: api_base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: None,
        }
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum completion tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_basic_auth_exact_encoding() {
        // base64("id1:secret1") == "aWQxOnNlY3JldDE="
        let credentials = Credentials::new("id1", "secret1");
        assert_eq!(credentials.basic_auth(), "Basic aWQxOnNlY3JldDE=");
    }

    #[test]
    fn test_basic_auth_roundtrip() {
        let credentials = Credentials::new("client-one", "swordfish");
        let value = credentials.basic_auth();
        let encoded = value.strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"client-one:swordfish");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("id1", "secret1");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("id1"));
        assert!(!debug.contains("secret1"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new(Credentials::new("a", "b"), "http://auth", "http://api");
        assert_eq!(config.model, "GigaChat");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 512);
        assert!(config.timeout_seconds.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::new(Credentials::new("a", "b"), "http://auth", "http://api")
            .with_model("GigaChat-Pro")
            .with_max_tokens(1024)
            .with_timeout(15);
        assert_eq!(config.model, "GigaChat-Pro");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout_seconds, Some(15));
    }
}
