//! # tasktalk-client
//!
//! Client library for the GigaChat API with OAuth2 client-credentials
//! token lifecycle management.
//!
//! The crate is built around two collaborators:
//! - [`auth::TokenManager`]: owns the cached access token and exposes
//!   "get a valid token" as its single operation, acquiring or refreshing
//!   transparently and serializing concurrent acquisitions.
//! - [`GigaChatClient`]: the business surface (a readiness probe, model
//!   listing, and structured task extraction over chat completions), with
//!   every failure normalized into one [`ClientError`] contract.
//!
//! Both upstream paths are reached through forwarding-proxy base URLs (see
//! the `tasktalk-proxy` crate); the client itself never talks to the real
//! hosts directly.
//!
//! ## Example
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
//!
//! let client = GigaChatClient::new(config)?;
//! let result = client
//!     .chat_completion("Напоминай сдавать отчёт каждый последний день месяца")
//!     .await?;
//! println!("{} ({:?} tokens)", result.content, result.tokens_used);
//! # Ok(())
//! # }
//! ```

/// Token acquisition and caching.
pub mod auth;
/// Error taxonomy and the shared normalization boundary.
pub mod error;
/// GigaChat wire types and client.
pub mod gigachat;

mod prompt;

pub use error::ClientError;
pub use gigachat::GigaChatClient;
