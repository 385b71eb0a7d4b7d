//! Error and retry-policy types shared by every operation.
//!
//! [`EpiError`] is what a caller receives when an operation fails. Failures
//! raised by collaborators ([`TransportError`] from the HTTP transport,
//! [`TokenError`] from the token provider) are wrapped without modification so
//! callers can still match on the original value.
//!
//! [`RetryPolicy`] is advisory only: no operation in this crate retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by [`EpiError::retry_policy`] so that callers which choose to
/// retry can do so without reverse-engineering the error.
///
/// ## Rules
///
/// - `Retryable` errors: connection failures, HTTP 429 and 5xx responses.
/// - `NonRetryable` errors: everything the wiki answered deliberately
///   (application errors, unknown users) and local failures (missing token,
///   malformed request).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    ///
    /// `after` optionally specifies the minimum delay before retrying (e.g.
    /// derived from a `Retry-After` response header).
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried as-is.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure reported by an [`crate::HttpTransport`].
///
/// The request could not be completed or its body could not be decoded. The
/// wiki's own logical errors are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransportError {
    /// The connection could not be established or was interrupted (includes timeouts).
    #[error("Connection failed: {message}")]
    Connection {
        /// Description from the underlying HTTP client.
        message: String,
    },

    /// The server answered with a non-success HTTP status.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Seconds from a `Retry-After` header, if the server sent one.
        retry_after_secs: Option<u64>,
    },

    /// The response body was not the JSON (or JSONP) the request asked for.
    #[error("Response could not be decoded: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// The request descriptor could not be turned into an HTTP request.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },
}

/// Failure reported by a [`crate::TokenProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TokenError {
    /// No edit token is available to the host environment.
    #[error("Edit token unavailable: {reason}")]
    Unavailable {
        /// Why the token could not be produced.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Operation errors
// ---------------------------------------------------------------------------

/// The single failure outcome of an operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EpiError {
    /// The transport failed; the inner value is exactly what it reported.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The edit token could not be obtained, so no request was sent.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The wiki executed the request but reported a logical failure
    /// (insufficient rights, nonexistent user, and so on).
    ///
    /// Holds the decoded error payload: the whole body for a chat ban, the
    /// nested `error` object for a block.
    #[error("Wiki reported an error: {0}")]
    Application(Value),

    /// The user-ID lookup received the literal string `"undefined"`.
    #[error("Wiki returned the sentinel value '{0}'")]
    Sentinel(String),

    /// The response decoded cleanly but lacks the member the operation reads.
    #[error("Response is missing `{path}`")]
    UnexpectedResponse {
        /// Dotted path of the member that was expected.
        path: &'static str,
    },
}

impl EpiError {
    /// Advises whether repeating the same call could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            EpiError::Transport(TransportError::Connection { .. }) => {
                RetryPolicy::Retryable { after: None }
            }
            EpiError::Transport(TransportError::Status {
                status,
                retry_after_secs,
            }) if *status == 429 || (500..600).contains(status) => RetryPolicy::Retryable {
                after: retry_after_secs.map(Duration::from_secs),
            },
            _ => RetryPolicy::NonRetryable,
        }
    }
}
