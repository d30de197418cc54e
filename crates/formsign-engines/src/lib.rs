// crates/formsign-engines/src/lib.rs
pub mod docuseal;
pub mod http;
pub mod wufoo;

use std::sync::Arc;

use formsign_core::config::BridgeConfig;
use formsign_core::error::BridgeResult;
use formsign_core::pipeline::Pipeline;

use crate::docuseal::DocusealClient;
use crate::wufoo::WufooClient;

/// Wires the upstream clients into a pipeline sharing one HTTP client.
pub fn create_pipeline(config: &BridgeConfig) -> BridgeResult<Pipeline> {
    let client = http::build_client(config.request_timeout)?;
    let source = WufooClient::new(config.form_provider.clone(), client.clone());
    let sink = DocusealClient::new(config.signing_service.clone(), client);
    Ok(Pipeline::new(
        Arc::new(source),
        Arc::new(sink),
        config.mapping.clone(),
    ))
}
