//! Extended Programming Interface (EPI) for MediaWiki.
//!
//! Turns the wiki's user-moderation calls into one-line async operations:
//! ban a user from chat, block a user, look up a user's numeric id. Each call
//! sends exactly one request and settles exactly once.
//!
//! ## Architectural Layer
//!
//! **Adapters + port definitions.** This crate has no network dependencies.
//! It defines the request shapes and response mapping; infrastructure crates
//! supply an [`HttpTransport`] and a [`TokenProvider`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`UserId`, `Username`, `EditToken`, `RequestId`) |
//! | [`types`] | Operation parameters (`BanParams`, `BlockParams`, ...) and `Expiry` |
//! | [`request`] | Request descriptors and the fixed wire shapes |
//! | [`ports`] | Collaborator traits (`HttpTransport`, `TokenProvider`) |
//! | [`user`] | The operations (`UserApi`) and their response mapping |
//! | [`errors`] | Error and retry-policy types |
//!
//! ## Example
//!
//! ```ignore
//! let api = UserApi::new(transport, tokens);
//! let id = api.user_id(UserIdLookupParams::new(name)).await?;
//! api.ban(BanParams::new(id, Expiry::Seconds(3600)).with_reason("Flooding")).await?;
//! ```

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod request;
pub mod types;
pub mod user;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{EpiError, RetryPolicy, TokenError, TransportError};
pub use identifiers::{EditToken, RequestId, UserId, Username};
pub use ports::{HttpTransport, TokenProvider};
pub use request::{Endpoint, FieldMap, FieldValue, HttpMethod, RequestDescriptor, ResponseFormat};
pub use types::{BanParams, BlockParams, Expiry, UserIdLookupParams};
pub use user::UserApi;
