//! [`HttpTransport`] over `reqwest`.

use async_trait::async_trait;
use epi::{HttpMethod, HttpTransport, RequestDescriptor, ResponseFormat, TransportError};
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::decode::{callback_name, decode_json, decode_jsonp, CALLBACK_FIELD};
use crate::WikiConfig;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Sends request descriptors to one wiki.
///
/// Every call is a single HTTP exchange; timeouts come from the client. The
/// wiki's application-level errors are returned as ordinary decoded bodies.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: WikiConfig,
}

impl ReqwestTransport {
    /// Builds a client with the configured timeout and user agent.
    pub fn new(config: WikiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .user_agent(config.user_agent_str())
            .build()
            .map_err(|e| TransportError::InvalidRequest {
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Uses an existing client, e.g. one carrying the session cookies of a
    /// logged-in user. The client's own timeout and user agent apply.
    pub fn with_client(client: reqwest::Client, config: WikiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(
        name = "mediawiki.send",
        skip_all,
        fields(request_id = %request.id, endpoint = %request.endpoint)
    )]
    async fn send(&self, request: RequestDescriptor) -> Result<Value, TransportError> {
        let RequestDescriptor {
            id,
            endpoint,
            method,
            format,
            mut fields,
        } = request;

        let callback = match format {
            ResponseFormat::Json => None,
            ResponseFormat::Jsonp => {
                let name = callback_name(id);
                fields.push(CALLBACK_FIELD, name.clone());
                Some(name)
            }
        };

        let url = self.config.script_url(endpoint).clone();
        let builder = match method {
            HttpMethod::Post => self
                .client
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(fields.encode()),
        };

        let response = builder.send().await.map_err(request_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(TransportError::Status {
                status: status.as_u16(),
                retry_after_secs,
            });
        }

        let body = response.text().await.map_err(request_error)?;
        match callback {
            Some(name) => decode_jsonp(&body, &name),
            None => decode_json(&body),
        }
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidRequest {
            message: err.to_string(),
        }
    } else {
        TransportError::Connection {
            message: err.to_string(),
        }
    }
}
