//! Response body decoding for JSON and JSONP.

use epi::{RequestId, TransportError};
use serde_json::Value;

/// Name of the field that asks MediaWiki to wrap its answer in a callback.
pub const CALLBACK_FIELD: &str = "callback";

/// JavaScript's `undefined`, which some handlers emit instead of JSON.
const UNDEFINED: &str = "undefined";

/// Prefix MediaWiki writes in front of JSONP output.
const JSONP_GUARD: &str = "/**/";

/// Callback name for a request. Unique per request so concurrent answers
/// cannot be confused.
pub fn callback_name(id: RequestId) -> String {
    format!("epi_{}", id.as_uuid().simple())
}

/// Decodes a plain JSON body. Anything that is not JSON, including a bare
/// `undefined`, is a decode error.
pub fn decode_json(body: &str) -> Result<Value, TransportError> {
    serde_json::from_str(body.trim()).map_err(|e| TransportError::Decode {
        message: e.to_string(),
    })
}

/// Decodes a JSONP body of the form `callback(...)` or `callback(...);`.
///
/// Bodies that are not wrapped at all (servers that ignore the callback
/// parameter) are decoded as plain JSON. A body wrapped in a different
/// callback is rejected. A script payload of `undefined`, wrapped or bare,
/// decodes to the string `"undefined"` so the caller can recognise it.
pub fn decode_jsonp(body: &str, callback: &str) -> Result<Value, TransportError> {
    let trimmed = body.trim();
    let trimmed = trimmed.strip_prefix(JSONP_GUARD).unwrap_or(trimmed).trim_start();

    let Some(rest) = trimmed.strip_prefix(callback) else {
        if looks_wrapped(trimmed) {
            return Err(TransportError::Decode {
                message: format!("JSONP body is not wrapped in '{callback}'"),
            });
        }
        return decode_script_value(trimmed);
    };

    let inner = rest
        .trim_start()
        .strip_prefix('(')
        .and_then(|s| s.trim_end().trim_end_matches(';').trim_end().strip_suffix(')'))
        .ok_or_else(|| TransportError::Decode {
            message: "Malformed JSONP wrapper".to_owned(),
        })?;

    decode_script_value(inner)
}

fn decode_script_value(text: &str) -> Result<Value, TransportError> {
    if text.trim() == UNDEFINED {
        return Ok(Value::String(UNDEFINED.to_owned()));
    }
    decode_json(text)
}

/// `true` for bodies shaped like `name(...)`.
fn looks_wrapped(body: &str) -> bool {
    match body.find('(') {
        Some(open) if open > 0 => body[..open]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')),
        _ => false,
    }
}
