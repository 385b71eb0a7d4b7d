//! MediaWiki infrastructure adapter for EPI.
//!
//! Implements the [`epi::HttpTransport`] trait over `reqwest` and provides
//! simple [`epi::TokenProvider`]s. Additional transports (for example one
//! that reuses a browser session) are added here without changes to the
//! [`epi`] crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL resolution, form encoding on the wire, HTTP status
//! handling and JSON/JSONP decoding live here. The [`epi`] crate sees only
//! [`epi::HttpTransport`] and [`epi::TokenProvider`].

pub mod config;
pub mod decode;
pub mod token;
pub mod transport;

pub use config::{ConfigError, WikiConfig};
pub use token::{EnvTokenProvider, StaticTokenProvider};
pub use transport::ReqwestTransport;
