//! # tasktalk-common
//!
//! Shared types for the tasktalk GigaChat client.
//!
//! This crate holds the data model the rest of the workspace is built on:
//! - [`Credentials`]: the OAuth2 client id/secret pair and its basic-auth encoding
//! - [`ClientConfig`]: connection details and generation defaults for the client
//! - [`Message`] / [`MessageRole`]: the chat messages sent to the completions API
//! - [`ChatResult`]: the value object a completion call resolves to
//!
//! ## Example
//!
//! ```
//! use tasktalk_common::{ClientConfig, Credentials, Message};
//!
//! let credentials = Credentials::new("my-client-id", "my-client-secret");
//! let config = ClientConfig::new(
//!     credentials,
//!     "https://localhost:8010/auth-proxy",
//!     "https://localhost:8010/api-proxy",
//! );
//!
//! let message = Message::user("Запланируй встречу на завтра в 10:00");
//! assert_eq!(config.model, "GigaChat");
//! assert_eq!(message.content, "Запланируй встречу на завтра в 10:00");
//! ```

/// Chat message and completion result types.
pub mod chat;
/// Credentials and client configuration.
pub mod config;

pub use chat::{ChatResult, Message, MessageRole};
pub use config::{ClientConfig, Credentials};
