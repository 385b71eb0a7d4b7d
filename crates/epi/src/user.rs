//! User moderation and lookup operations.
//!
//! Each operation is a three-step adapter: build a [`RequestDescriptor`],
//! send it through the injected [`HttpTransport`], and map the decoded body to
//! a single outcome. The mapping rules are exposed as pure functions so they
//! can be reused by callers that bring their own dispatch.
//!
//! | Operation | Endpoint | Success value | Failure |
//! |-----------|----------|---------------|---------|
//! | [`UserApi::ban`] | `index.php` | whole body | body has a truthy `error` → whole body |
//! | [`UserApi::block`] | `api.php` | `block` member | truthy `error` → the `error` member |
//! | [`UserApi::user_id`] | `api.php` (JSONP) | `query.users[0].userid` | `"undefined"` sentinel, or the path is absent |

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, field, instrument, warn, Span};

use crate::request::{ban_request, block_request, user_id_request};
use crate::{
    BanParams, BlockParams, EpiError, HttpTransport, RequestDescriptor, TokenProvider, UserId,
    UserIdLookupParams,
};

/// Literal body the user-ID lookup treats as a failure.
pub const UNDEFINED_SENTINEL: &str = "undefined";

/// Entry point for the user operations.
///
/// Cheap to clone; clones share the same collaborators. Calls are
/// independent of each other and may run concurrently.
#[derive(Clone)]
pub struct UserApi {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenProvider>,
}

impl UserApi {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { transport, tokens }
    }

    /// Bans a user from the wiki's chat. Requires chat moderator rights.
    ///
    /// Resolves with the entire decoded response.
    #[instrument(
        name = "epi.user.ban",
        skip_all,
        fields(user_id = %params.user_id, request_id = field::Empty)
    )]
    pub async fn ban(&self, params: BanParams) -> Result<Value, EpiError> {
        let token = self.tokens.edit_token()?;
        let request = ban_request(&params, &token);
        self.dispatch(request, map_ban_response).await
    }

    /// Blocks a user from editing the wiki. Requires administrator rights.
    ///
    /// Resolves with the `block` member of the response.
    #[instrument(
        name = "epi.user.block",
        skip_all,
        fields(username = %params.username, request_id = field::Empty)
    )]
    pub async fn block(&self, params: BlockParams) -> Result<Value, EpiError> {
        let token = self.tokens.edit_token()?;
        let request = block_request(&params, &token);
        self.dispatch(request, map_block_response).await
    }

    /// Resolves a username to its numeric id.
    #[instrument(
        name = "epi.user.user_id",
        skip_all,
        fields(username = %params.username, request_id = field::Empty)
    )]
    pub async fn user_id(&self, params: UserIdLookupParams) -> Result<UserId, EpiError> {
        let request = user_id_request(&params);
        self.dispatch(request, map_user_id_response).await
    }

    async fn dispatch<T>(
        &self,
        request: RequestDescriptor,
        map: fn(Value) -> Result<T, EpiError>,
    ) -> Result<T, EpiError> {
        Span::current().record("request_id", field::display(request.id));
        debug!(endpoint = %request.endpoint, "Sending request");

        let body = self.transport.send(request).await.map_err(|err| {
            warn!(error = %err, "Transport failed");
            err
        })?;

        let outcome = map(body);
        if let Err(err) = &outcome {
            debug!(error = %err, "Wiki rejected request");
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

/// Maps a chat-ban response: a truthy `error` rejects with the whole body.
pub fn map_ban_response(body: Value) -> Result<Value, EpiError> {
    if body.get("error").is_some_and(is_truthy) {
        return Err(EpiError::Application(body));
    }
    Ok(body)
}

/// Maps a block response: a truthy `error` rejects with that member,
/// otherwise the `block` member is the result.
pub fn map_block_response(mut body: Value) -> Result<Value, EpiError> {
    if let Some(error) = body.get_mut("error").filter(|e| is_truthy(e)) {
        return Err(EpiError::Application(error.take()));
    }
    body.get_mut("block")
        .map(Value::take)
        .ok_or(EpiError::UnexpectedResponse { path: "block" })
}

/// Maps a user-ID lookup response.
///
/// The literal string `"undefined"` is rejected as a sentinel. A top-level
/// `error` is rejected as an application error. Any other body without a
/// numeric `query.users[0].userid` (including the `missing` entry MediaWiki
/// returns for unknown names) is an unexpected response.
pub fn map_user_id_response(mut body: Value) -> Result<UserId, EpiError> {
    if let Value::String(text) = &body {
        if text == UNDEFINED_SENTINEL {
            return Err(EpiError::Sentinel(UNDEFINED_SENTINEL.to_owned()));
        }
    }
    if let Some(error) = body.get_mut("error").filter(|e| is_truthy(e)) {
        return Err(EpiError::Application(error.take()));
    }
    body.pointer("/query/users/0/userid")
        .and_then(Value::as_u64)
        .map(UserId::new)
        .ok_or(EpiError::UnexpectedResponse {
            path: "query.users[0].userid",
        })
}

/// JavaScript truthiness of a decoded JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
