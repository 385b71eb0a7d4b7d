//! Newtype identifiers for wiki users, credentials and requests.
//!
//! A [`UserId`] and a plain integer duration are both numbers on the wire, and
//! a [`Username`] and an [`EditToken`] are both strings; the newtypes keep them
//! from being swapped when a request is assembled.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — wiki-assigned integers
// ---------------------------------------------------------------------------

/// Numeric identifier MediaWiki assigns to a registered account.
///
/// Returned by the user-ID lookup and consumed by the chat ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    /// Creates a new identifier from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// A wiki account name as typed by a human (e.g. `"Example User"`).
    ///
    /// Sent verbatim; MediaWiki normalises case and underscores itself.
    Username
}

/// Per-session credential MediaWiki requires for state-changing actions.
///
/// The value is deliberately hidden from [`Debug`] output so that tracing a
/// request descriptor never leaks it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EditToken(String);

impl EditToken {
    /// Creates a token, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw token for placing on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for EditToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EditToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one outbound request.
///
/// Generated fresh for every request descriptor and recorded on the tracing
/// span of the call, so interleaved log lines of concurrent calls can be told
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_rejected() {
        assert!(Username::new("").is_none());
        assert!(EditToken::new("").is_none());
        assert_eq!(Username::new("Sannse").unwrap().as_str(), "Sannse");
    }

    #[test]
    fn edit_token_debug_is_redacted() {
        let token = EditToken::new("abc123+\\").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("abc123"));
        assert_eq!(token.expose(), "abc123+\\");
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new_random(), RequestId::new_random());
    }
}
