//! GigaChat client implementation.
//!
//! Composes the token manager with the two business endpoints. Every
//! operation provisions a token first; failures cross the operation
//! boundary through [`ClientError::normalize`], so callers see one error
//! contract regardless of which call failed.
//!
//! # Examples
//!
//! ```no_run
//! use tasktalk_client::GigaChatClient;
//! use tasktalk_common::{ClientConfig, Credentials};
//!
//! # async fn example() -> Result<(), tasktalk_client::ClientError> {
//! let config = ClientConfig::new(
//!     Credentials::new("my-client-id", "my-client-secret"),
//!     "http://127.0.0.1:8010/auth-proxy",
//!     "http://127.0.0.1:8010/api-proxy",
//! );
//! let client = GigaChatClient::new(config)?;
//!
//! if client.test_connection().await {
//!     let result = client.chat_completion("Напомни полить цветы в пятницу").await?;
//!     println!("{}", result.content);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::{debug, warn};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use tasktalk_common::{ChatResult, ClientConfig, Message};

use crate::auth::TokenManager;
use crate::error::{ClientError, upstream_message};
use crate::gigachat::{CompletionRequest, CompletionResponse};
use crate::prompt;

/// Models endpoint path under the api base URL.
const MODELS_PATH: &str = "/api/v1/models";

/// Completions endpoint path under the api base URL.
const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// Client for the GigaChat API.
///
/// Holds the one HTTP connection pool; the token manager shares it, so a
/// client instance makes exactly one pool's worth of connections across
/// both upstream paths.
#[derive(Debug)]
pub struct GigaChatClient {
    http: reqwest::Client,
    config: ClientConfig,
    token_manager: TokenManager,
    api_base_url: String,
}

impl GigaChatClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when either base URL does not
    /// parse, or [`ClientError::Network`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        for base_url in [&config.auth_base_url, &config.api_base_url] {
            url::Url::parse(base_url).map_err(|err| {
                ClientError::Configuration(format!("invalid base URL '{base_url}': {err}"))
            })?;
        }

        let http = match config.timeout_seconds {
            Some(timeout) => reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout))
                .build()?,
            None => reqwest::Client::builder().build()?,
        };

        let token_manager = TokenManager::new(
            http.clone(),
            config.credentials.clone(),
            &config.auth_base_url,
        );
        let api_base_url = config.api_base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            config,
            token_manager,
            api_base_url,
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Readiness probe: attempts token provisioning and reports the outcome
    /// as a boolean, absorbing the underlying error.
    ///
    /// A `true` result leaves the acquired token cached as a byproduct.
    pub async fn test_connection(&self) -> bool {
        match self.token_manager.ensure_token().await {
            Ok(_) => true,
            Err(err) => {
                debug!("connection test failed: {err}");
                false
            }
        }
    }

    /// Lists the models available to this account.
    ///
    /// Returns the decoded response body as-is; the models payload is the
    /// one surface this client does not reshape.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ClientError`] for token, transport, or
    /// upstream failures.
    pub async fn list_models(&self) -> Result<serde_json::Value, ClientError> {
        self.models().await.map_err(ClientError::normalize)
    }

    /// Extracts a structured task from the caller's text.
    ///
    /// Sends the fixed two-message conversation (system schema instruction,
    /// then the templated user block embedding `prompt` unmodified) and
    /// resolves to the first choice's content plus the reported token usage.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ClientError`] for token, transport, or
    /// upstream failures.
    pub async fn chat_completion(&self, prompt: &str) -> Result<ChatResult, ClientError> {
        self.completion(prompt).await.map_err(ClientError::normalize)
    }

    async fn models(&self) -> Result<serde_json::Value, ClientError> {
        let token = self.token_manager.ensure_token().await?;

        let response = self
            .http
            .get(format!("{}{MODELS_PATH}", self.api_base_url))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn completion(&self, prompt: &str) -> Result<ChatResult, ClientError> {
        let token = self.token_manager.ensure_token().await?;

        let request = CompletionRequest::builder()
            .model(self.config.model.clone())
            .messages(vec![
                Message::system(prompt::SYSTEM_PROMPT),
                Message::user(prompt::user_prompt(prompt)),
            ])
            .temperature(Some(self.config.temperature))
            .max_tokens(Some(self.config.max_tokens))
            .build();

        let response = self
            .http
            .post(format!("{}{COMPLETIONS_PATH}", self.api_base_url))
            .bearer_auth(token.expose_secret())
            .json(&request)
            .send()
            .await?;

        let parsed: CompletionResponse = Self::decode(response).await?;
        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ClientError::InvalidResponse("completion returned no choices".to_string())
        })?;

        Ok(ChatResult {
            content: choice.message.content,
            tokens_used: parsed.usage.map(|usage| usage.total_tokens),
        })
    }

    /// Checks the status and decodes the body, extracting the structured
    /// upstream error message from non-2xx responses.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, &body);
            warn!("API request failed with status {status}: {message}");
            return Err(ClientError::Upstream(message));
        }

        let text = response.text().await?;
        debug!("raw API response: {text}");
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use tasktalk_common::Credentials;

    use super::*;

    fn token_response(access_token: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "expires_in": 1800,
            "token_type": "Bearer"
        }))
    }

    async fn mount_token_endpoint(server: &MockServer, access_token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth"))
            .respond_with(token_response(access_token))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> GigaChatClient {
        let config = ClientConfig::new(
            Credentials::new("test-client", "test-secret"),
            server.uri(),
            server.uri(),
        );
        GigaChatClient::new(config).unwrap()
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let config = ClientConfig::new(
            Credentials::new("a", "b"),
            "not a url",
            "http://127.0.0.1:8010/api-proxy",
        );
        let err = GigaChatClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_list_models_sends_bearer_token() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        let models_body = serde_json::json!({
            "object": "list",
            "data": [{"id": "GigaChat", "object": "model"}]
        });
        Mock::given(method("GET"))
            .and(path("/api/v1/models"))
            .and(header("authorization", "Bearer tok-A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(models_body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let models = client.list_models().await.unwrap();
        assert_eq!(models, models_body);
    }

    #[tokio::test]
    async fn test_chat_completion_resolves_content_and_usage() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer tok-A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"title\":\"Отчёт\"}"}}],
                "usage": {"prompt_tokens": 50, "completion_tokens": 37, "total_tokens": 87}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.chat_completion("сдать отчёт").await.unwrap();
        assert_eq!(result.content, "{\"title\":\"Отчёт\"}");
        assert_eq!(result.tokens_used, Some(87));
    }

    #[tokio::test]
    async fn test_chat_completion_without_usage_reports_none() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "{}"}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.chat_completion("что-нибудь").await.unwrap();
        assert_eq!(result.tokens_used, None);
    }

    #[tokio::test]
    async fn test_chat_completion_request_shape() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "{}"}}]
            })))
            .mount(&server)
            .await;

        let user_text = "Запланируй звонок маме через 2 дня";
        let client = client_for(&server);
        client.chat_completion(user_text).await.unwrap();

        let request = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.url.path() == "/api/v1/chat/completions")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();

        assert_eq!(body["model"], "GigaChat");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["max_tokens"], 512);

        // Exactly two messages: the fixed system instruction, then the
        // templated user block with the caller's text embedded unmodified.
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(
            messages[0]["content"].as_str().unwrap(),
            prompt::SYSTEM_PROMPT
        );
        assert_eq!(messages[1]["role"], "user");
        let user_content = messages[1]["content"].as_str().unwrap();
        assert!(user_content.contains(&format!("Пользователь сказал: \"{user_text}\"")));
    }

    #[tokio::test]
    async fn test_test_connection_outcomes() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;
        let client = client_for(&server);
        assert!(client.test_connection().await);

        let failing = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "invalid_client"})),
            )
            .mount(&failing)
            .await;
        let client = client_for(&failing);
        assert!(!client.test_connection().await);
    }

    #[tokio::test]
    async fn test_auth_failure_surfaces_through_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "invalid_client"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.chat_completion("привет").await.unwrap_err();
        assert!(matches!(&err, ClientError::Auth(m) if m == "invalid_client"));
    }

    #[tokio::test]
    async fn test_upstream_error_payload_is_normalized() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "model overloaded"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.chat_completion("привет").await.unwrap_err();
        assert!(matches!(&err, ClientError::Upstream(m) if m == "model overloaded"));
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[tokio::test]
    async fn test_models_failure_is_normalized_too() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        Mock::given(method("GET"))
            .and(path("/api/v1/models"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(serde_json::json!({"error": "forbidden"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_models().await.unwrap_err();
        assert!(matches!(&err, ClientError::Upstream(m) if m == "forbidden"));
    }

    #[tokio::test]
    async fn test_empty_choices_degrade_to_unknown() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "tok-A").await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.chat_completion("привет").await.unwrap_err();
        assert!(matches!(err, ClientError::Unknown));
    }

    #[tokio::test]
    async fn test_token_is_reused_across_operations() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/oauth"))
            .respond_with(token_response("tok-A"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "{}"}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.test_connection().await);
        client.list_models().await.unwrap();
        client.chat_completion("привет").await.unwrap();
    }
}
