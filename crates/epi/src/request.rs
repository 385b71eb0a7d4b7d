//! Request descriptors and the three fixed wire shapes.
//!
//! A [`RequestDescriptor`] is built fresh for each call, handed to the
//! transport by value, and dropped once the transport answers. The builders
//! at the bottom of this module are the only place the wire contract of the
//! remote API is written down.

use url::form_urlencoded;

use crate::{BanParams, BlockParams, EditToken, RequestId, UserIdLookupParams};

// ---------------------------------------------------------------------------
// Descriptor parts
// ---------------------------------------------------------------------------

/// Which MediaWiki entry point a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `index.php`, which also dispatches extension AJAX handlers.
    Index,
    /// `api.php`, the action API.
    Api,
}

impl Endpoint {
    /// File name of the entry-point script.
    pub fn script_name(self) -> &'static str {
        match self {
            Endpoint::Index => "index.php",
            Endpoint::Api => "api.php",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.script_name())
    }
}

/// HTTP method of a request. Every wire shape is a form POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Fields travel as an `application/x-www-form-urlencoded` body.
    Post,
}

/// How the transport must decode the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    /// Plain JSON.
    Json,
    /// JSON wrapped in a callback invocation (`cb({...})`).
    Jsonp,
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Value of one outgoing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Encoded as `key=value`.
    Text(String),
    /// Encoded as the bare `key`, with no `=`.
    Marker,
}

/// Ordered list of outgoing fields.
///
/// Order is preserved on the wire. The `token` field is redacted from
/// [`Debug`] output.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct FieldMap {
    fields: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `key=value` field.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields
            .push((key.into(), FieldValue::Text(value.into())));
        self
    }

    /// Appends a bare marker field.
    pub fn push_marker(&mut self, key: impl Into<String>) -> &mut Self {
        self.fields.push((key.into(), FieldValue::Marker));
        self
    }

    /// Returns the text of the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find_map(|(k, v)| match v {
            FieldValue::Text(text) if k == key => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns `true` if a bare marker named `key` is present.
    pub fn has_marker(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|(k, v)| k == key && *v == FieldValue::Marker)
    }

    /// Iterates over the fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialises the fields as a form body / query string.
    ///
    /// Text fields use `application/x-www-form-urlencoded` escaping (space
    /// becomes `+`); markers are appended as bare names.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            if !out.is_empty() {
                out.push('&');
            }
            out.extend(form_urlencoded::byte_serialize(key.as_bytes()));
            if let FieldValue::Text(text) = value {
                out.push('=');
                out.extend(form_urlencoded::byte_serialize(text.as_bytes()));
            }
        }
        out
    }
}

impl std::fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.fields {
            match value {
                FieldValue::Text(_) if key == TOKEN_FIELD => map.entry(key, &"<redacted>"),
                FieldValue::Text(text) => map.entry(key, text),
                FieldValue::Marker => map.entry(key, &true),
            };
        }
        map.finish()
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Everything a transport needs to send one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Correlation id for tracing.
    pub id: RequestId,
    /// Target entry point.
    pub endpoint: Endpoint,
    /// HTTP method.
    pub method: HttpMethod,
    /// Expected response encoding.
    pub format: ResponseFormat,
    /// Outgoing fields, in wire order.
    pub fields: FieldMap,
}

impl RequestDescriptor {
    /// Creates a POST descriptor with a fresh [`RequestId`].
    pub fn post(endpoint: Endpoint, format: ResponseFormat, fields: FieldMap) -> Self {
        Self {
            id: RequestId::new_random(),
            endpoint,
            method: HttpMethod::Post,
            format,
            fields,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

const TOKEN_FIELD: &str = "token";

/// Builds the chat-ban request handled by the ChatAjax extension endpoint.
///
/// Every field is always present; an absent reason is sent as `reason=`.
///
/// `action=ajax&rs=ChatAjax&method=blockOrBanChat&userToBanId=…&time=…&reason=…&mode=global&token=…`
pub fn ban_request(params: &BanParams, token: &EditToken) -> RequestDescriptor {
    let mut fields = FieldMap::new();
    fields
        .push("action", "ajax")
        .push("rs", "ChatAjax")
        .push("method", "blockOrBanChat")
        .push("userToBanId", params.user_id.to_string())
        .push("time", params.duration.to_string())
        .push("reason", params.reason.as_deref().unwrap_or(""))
        .push("mode", "global")
        .push(TOKEN_FIELD, token.expose());

    RequestDescriptor::post(Endpoint::Index, ResponseFormat::Json, fields)
}

/// Builds the `action=block` API request.
///
/// `nocreate` and `autoblock` are bare markers appended after the token, in
/// that order, when the matching `allow_*` switch is off.
pub fn block_request(params: &BlockParams, token: &EditToken) -> RequestDescriptor {
    let mut fields = FieldMap::new();
    fields
        .push("action", "block")
        .push("user", params.username.as_str())
        .push("expiry", params.duration.to_string())
        .push("reason", params.reason.as_deref().unwrap_or(""))
        .push("format", "json")
        .push(TOKEN_FIELD, token.expose());
    if !params.allow_account_creation {
        fields.push_marker("nocreate");
    }
    if !params.allow_autoblock_exemption {
        fields.push_marker("autoblock");
    }

    RequestDescriptor::post(Endpoint::Api, ResponseFormat::Json, fields)
}

/// Builds the `list=users` query used to resolve a name to an id.
///
/// The answer is requested as JSONP; no token is needed for reads.
pub fn user_id_request(params: &UserIdLookupParams) -> RequestDescriptor {
    let mut fields = FieldMap::new();
    fields
        .push("action", "query")
        .push("list", "users")
        .push("ususers", params.username.as_str())
        .push("usprop", "")
        .push("format", "json");

    RequestDescriptor::post(Endpoint::Api, ResponseFormat::Jsonp, fields)
}
