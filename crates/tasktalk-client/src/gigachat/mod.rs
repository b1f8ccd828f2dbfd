//! GigaChat API types and client implementation.
//!
//! This module provides the wire types for the GigaChat chat-completions
//! endpoint and the [`GigaChatClient`] that drives them.

use serde::Deserialize;
use serde::Serialize;
use typed_builder::TypedBuilder;

use tasktalk_common::Message;

pub mod client;
pub use client::GigaChatClient;

/// Request body for the completions endpoint.
///
/// # Examples
///
/// ```
/// use tasktalk_client::gigachat::CompletionRequest;
/// use tasktalk_common::Message;
///
/// let request = CompletionRequest::builder()
///     .model("GigaChat".to_string())
///     .messages(vec![Message::user("привет")])
///     .temperature(Some(0.7))
///     .max_tokens(Some(512))
///     .build();
/// ```
#[derive(Debug, Clone, Serialize, TypedBuilder)]
pub struct CompletionRequest {
    /// The model identifier to use.
    pub model: String,
    /// The conversation messages.
    pub messages: Vec<Message>,
    /// Sampling temperature (optional).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate (optional).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response from a completion request.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    /// Generated completions; the client only ever reads the first.
    pub choices: Vec<CompletionChoice>,
    /// Token usage statistics, absent from some responses.
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

/// A single choice from a completion response.
#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    /// The generated message for this choice.
    pub message: CompletionMessage,
}

/// The message inside a completion choice.
///
/// Only the content survives into [`ChatResult`](tasktalk_common::ChatResult);
/// the role is implied.
#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    /// The text content of the generated message.
    pub content: String,
}

/// Token usage statistics for a completion.
#[derive(Debug, Deserialize)]
pub struct CompletionUsage {
    /// Total tokens consumed by the request.
    pub total_tokens: u32,
}
