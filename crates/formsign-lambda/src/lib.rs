use formsign_core::config::{BridgeConfig, ErrorStatusMode, HandlerSettings};
use formsign_core::error::{BridgeError, BridgeResult, ErrorKind};
use formsign_core::pipeline::Pipeline;
use formsign_core::types::HttpResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// The subset of an API Gateway proxy event the handler reads.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    // API Gateway sends null when the URL has no query string
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

pub struct Handler {
    pipeline: Pipeline,
    settings: HandlerSettings,
}

impl Handler {
    pub fn new(pipeline: Pipeline, settings: HandlerSettings) -> Self {
        Self { pipeline, settings }
    }

    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        let pipeline = formsign_engines::create_pipeline(config)?;
        Ok(Self::new(pipeline, config.handler.clone()))
    }

    pub async fn handle_event(&self, event: ProxyRequest) -> HttpResult {
        let query = event.query_string_parameters.unwrap_or_default();
        self.handle(&query).await
    }

    /// Runs the pipeline for the entry named in `query`.
    ///
    /// A missing or blank identifier is rejected with 400 before any
    /// upstream call. Pipeline failures are logged here and nowhere else.
    pub async fn handle(&self, query: &HashMap<String, String>) -> HttpResult {
        let param = &self.settings.query_param_name;
        let entry_id = match query.get(param).map(|v| v.trim()).filter(|v| !v.is_empty()) {
            Some(entry_id) => entry_id,
            None => {
                warn!("Request without '{}' query parameter", param);
                return HttpResult::plain_text(
                    400,
                    format!(
                        "Error: No entry_id provided in query parameter (?{}=EntryId)",
                        param
                    ),
                );
            }
        };

        match self.pipeline.run(entry_id).await {
            Ok(link) => {
                info!("Redirecting entry {} to signing link", entry_id);
                HttpResult::redirect(self.settings.redirect_status, link)
            }
            Err(err) => {
                error!(kind = %err.kind(), entry_id = %entry_id, "{}", err);
                HttpResult::plain_text(
                    status_for(&err, self.settings.error_status_mode),
                    format!("Error: {}", err),
                )
            }
        }
    }
}

/// Status code reported for a pipeline failure.
pub fn status_for(err: &BridgeError, mode: ErrorStatusMode) -> u16 {
    match mode {
        ErrorStatusMode::Uniform => 500,
        ErrorStatusMode::Classified => match err.kind() {
            ErrorKind::Validation => 422,
            ErrorKind::NotFound => 404,
            ErrorKind::Upstream => 502,
            ErrorKind::Configuration => 500,
        },
    }
}
