//! Chat messages exchanged with the completions API.
//!
//! Messages are deliberately minimal: the completions endpoint takes a role
//! and a content string, nothing else. The richer conversation bookkeeping
//! some providers need has no place in this client.

use serde::{Deserialize, Serialize};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Instructions and context for the model, set once per request.
    #[serde(rename = "system")]
    System,
    /// Input from the end user.
    #[serde(rename = "user")]
    User,
    /// A reply generated by the model.
    #[serde(rename = "assistant")]
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
///
/// Serializes to the `{role, content}` shape the completions endpoint expects.
///
/// # Examples
///
/// ```
/// use tasktalk_common::{Message, MessageRole};
///
/// let msg = Message::system("Ты - интеллектуальный ассистент.");
/// assert_eq!(msg.role, MessageRole::System);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: MessageRole,
    /// The text content of the message.
    pub content: String,
}

impl Message {
    /// Creates a message with the given role and content.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// The outcome of a completion call.
///
/// `tokens_used` is `None` when the response carried no usage block; it is
/// never defaulted to zero, so callers can tell "unreported" from "free".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    /// The content of the first choice's message.
    pub content: String,
    /// Total tokens consumed by the request, if the API reported usage.
    pub tokens_used: Option<u32>,
}
