//! OAuth2 client-credentials token lifecycle.
//!
//! [`TokenManager`] owns the one cached access token and exposes a single
//! operation: give me a valid token. Acquisition happens lazily on first
//! use and again once the declared lifetime (minus a safety margin) has
//! elapsed. The token slot is guarded by an async mutex that is held across
//! the acquisition await, so a burst of concurrent first callers queues up
//! and performs exactly one network acquisition between them.

use std::time::{Duration, Instant};

use log::{debug, warn};
use reqwest::header;
use secrecy::SecretString;
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use tasktalk_common::Credentials;

use crate::error::{ClientError, upstream_message};

/// OAuth scope requested for personal GigaChat accounts.
pub const TOKEN_SCOPE: &str = "GIGACHAT_API_PERS";

/// Token endpoint path under the auth base URL.
const TOKEN_PATH: &str = "/api/v2/oauth";

/// Correlation identifier header required by the token endpoint.
const RQUID_HEADER: &str = "RqUID";

/// Subtracted from the declared lifetime before a token counts as expired,
/// so a token is never presented within a minute of its upstream deadline.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A bearer token issued by the token endpoint.
#[derive(Debug, Clone)]
pub struct Token {
    access_token: SecretString,
    token_type: String,
    expires_in: u64,
    acquired_at: Instant,
}

impl Token {
    /// The access token value.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// The token type as declared by the endpoint (normally `Bearer`).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// The declared lifetime in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// Whether the declared lifetime, less the safety margin, has elapsed
    /// since acquisition.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.acquired_at.elapsed() + EXPIRY_MARGIN >= Duration::from_secs(self.expires_in)
    }
}

/// Wire shape of a successful token-endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    token_type: String,
}

impl From<TokenResponse> for Token {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::new(response.access_token.into()),
            token_type: response.token_type,
            expires_in: response.expires_in,
            acquired_at: Instant::now(),
        }
    }
}

/// Produces a valid bearer token on demand, acquiring or refreshing as needed.
#[derive(Debug)]
pub struct TokenManager {
    http: reqwest::Client,
    credentials: Credentials,
    token_url: String,
    token: Mutex<Option<Token>>,
}

impl TokenManager {
    /// Creates a manager that will post to `<auth_base_url>/api/v2/oauth`.
    pub fn new(http: reqwest::Client, credentials: Credentials, auth_base_url: &str) -> Self {
        Self {
            http,
            credentials,
            token_url: format!("{}{TOKEN_PATH}", auth_base_url.trim_end_matches('/')),
            token: Mutex::new(None),
        }
    }

    /// Returns a valid access token, acquiring one first if none is held or
    /// the held token has expired.
    ///
    /// The slot lock is held across the acquisition, so concurrent callers
    /// coalesce onto one network call; each caller re-checks the slot once
    /// it holds the lock. The slot is only written after a successful
    /// acquisition, so on failure any previously held token stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when acquisition fails.
    pub async fn ensure_token(&self) -> Result<SecretString, ClientError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        let token = self.acquire_token().await?;
        let access_token = token.access_token.clone();
        *slot = Some(token);
        Ok(access_token)
    }

    /// Whether a non-expired token is currently held.
    pub async fn has_valid_token(&self) -> bool {
        self.token
            .lock()
            .await
            .as_ref()
            .is_some_and(|token| !token.is_expired())
    }

    /// Posts the client credentials to the token endpoint.
    ///
    /// The request is form-encoded with the fixed scope, authorized with the
    /// basic-auth credential value, and tagged with a fresh `RqUID`
    /// correlation identifier.
    async fn acquire_token(&self) -> Result<Token, ClientError> {
        let rquid = Uuid::new_v4().to_string();
        debug!("acquiring access token (RqUID {rquid})");

        let response = self
            .http
            .post(&self.token_url)
            .header(header::AUTHORIZATION, self.credentials.basic_auth())
            .header(RQUID_HEADER, rquid)
            .form(&[("scope", TOKEN_SCOPE)])
            .send()
            .await
            .map_err(|err| ClientError::Auth(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, &body);
            warn!("token acquisition failed with status {status}: {message}");
            return Err(ClientError::Auth(message));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|err| ClientError::Auth(err.to_string()))?;

        debug!(
            "acquired {} token valid for {}s",
            parsed.token_type, parsed.expires_in
        );
        Ok(Token::from(parsed))
    }
}
