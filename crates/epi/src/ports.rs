//! Collaborator traits supplied by the host environment.
//!
//! This crate never opens a connection or reads a session. Infrastructure
//! crates implement [`HttpTransport`] and [`TokenProvider`], and the
//! composition root injects them into [`crate::UserApi`].

use async_trait::async_trait;
use serde_json::Value;

use crate::{EditToken, RequestDescriptor, TokenError, TransportError};

/// Sends one request and returns its decoded body.
///
/// Implementations own every connection-level concern: base URL, cookies,
/// timeouts, connection reuse. They must decode the body according to
/// [`RequestDescriptor::format`] and must not interpret the wiki's
/// application-level errors, which arrive as ordinary decoded bodies.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` once. No retries.
    async fn send(&self, request: RequestDescriptor) -> Result<Value, TransportError>;
}

/// Supplies the current edit token.
///
/// Called synchronously, once per state-changing call, while the request is
/// being built. An error aborts the call before anything is sent.
pub trait TokenProvider: Send + Sync {
    fn edit_token(&self) -> Result<EditToken, TokenError>;
}
