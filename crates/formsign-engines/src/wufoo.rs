use async_trait::async_trait;
use formsign_core::config::FormProviderConfig;
use formsign_core::error::{BridgeError, BridgeResult};
use formsign_core::traits::EntrySource;
use formsign_core::types::EntryRecord;
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::http::{decode_error, ensure_success, transport_error};

pub const SERVICE: &str = "wufoo";

// Wufoo authenticates on the username alone; the password is ignored.
const BASIC_AUTH_PASSWORD: &str = "footastic";

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(rename = "Entries", default)]
    entries: Option<Vec<Value>>,
}

pub struct WufooClient {
    config: FormProviderConfig,
    client: Client,
}

impl WufooClient {
    pub fn new(config: FormProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Form id is appended as a single escaped path segment.
    pub fn entries_url(&self) -> BridgeResult<Url> {
        let invalid_base =
            || BridgeError::config(format!("Invalid Wufoo base URL: {}", self.config.base_url));
        let mut url = Url::parse(&self.config.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(["api", "v3", "forms", self.config.form_id.as_str(), "entries.json"]);
        Ok(url)
    }
}

#[async_trait]
impl EntrySource for WufooClient {
    async fn fetch_entry(&self, entry_id: &str) -> BridgeResult<EntryRecord> {
        let url = self.entries_url()?;
        let filter = format!("EntryId Is_equal_to {}", entry_id);
        debug!("Fetching entry {} from {}", entry_id, url);

        let response = self
            .client
            .get(url)
            .query(&[("Filter1", filter.as_str())])
            .basic_auth(&self.config.api_key, Some(BASIC_AUTH_PASSWORD))
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: EntriesResponse = response
            .json()
            .await
            .map_err(|e| decode_error(SERVICE, e))?;

        let first = body
            .entries
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                BridgeError::NotFound(format!("No entry found for EntryId: {}", entry_id))
            })?;

        match first {
            Value::Object(entry) => Ok(entry),
            other => Err(BridgeError::validation(format!(
                "Entry {} is not an object: {}",
                entry_id, other
            ))),
        }
    }
}
