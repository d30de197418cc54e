use async_trait::async_trait;
use formsign_core::config::SigningServiceConfig;
use formsign_core::error::{BridgeError, BridgeResult};
use formsign_core::redaction::redact_secrets_in_text;
use formsign_core::traits::SubmissionSink;
use formsign_core::types::SubmissionPayload;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::http::{decode_error, ensure_success, transport_error};

pub const SERVICE: &str = "docuseal";
pub const AUTH_HEADER: &str = "x-auth-token";

pub struct DocusealClient {
    config: SigningServiceConfig,
    client: Client,
}

impl DocusealClient {
    pub fn new(config: SigningServiceConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn submissions_url(&self) -> String {
        format!("{}/submissions", self.config.base_url)
    }

    fn headers(&self) -> BridgeResult<HeaderMap> {
        let api_key = self.config.api_key.trim();
        if api_key.is_empty() {
            return Err(BridgeError::config(
                "Missing or empty DOCUSEAL_API_KEY setting",
            ));
        }
        let mut token = HeaderValue::from_str(api_key).map_err(|_| {
            BridgeError::config("DOCUSEAL_API_KEY contains characters not allowed in a header")
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl SubmissionSink for DocusealClient {
    async fn create_submission(&self, payload: &SubmissionPayload) -> BridgeResult<Value> {
        let headers = self.headers()?;
        let url = self.submissions_url();

        info!("Creating submission at {}", url);
        debug!(
            "Sending submission with headers: {}",
            redact_secrets_in_text(&format!("{:?}", headers))
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        let response = ensure_success(SERVICE, response).await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| decode_error(SERVICE, e))
    }
}
