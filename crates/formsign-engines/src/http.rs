use formsign_core::error::{BridgeError, BridgeResult};
use log::debug;
use reqwest::{Client, Response};
use std::time::Duration;

/// One client per process; every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> BridgeResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| BridgeError::config(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn transport_error(service: &str, error: reqwest::Error) -> BridgeError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error.without_url())
    } else {
        error.without_url().to_string()
    };
    BridgeError::upstream(service, None, message)
}

/// Turns a non-success status into an upstream error. The response body is
/// only logged; the error carries the status reason.
pub(crate) async fn ensure_success(service: &str, response: Response) -> BridgeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("{} responded with {}: {}", service, status, body);

    let message = status.canonical_reason().unwrap_or("request failed");
    Err(BridgeError::upstream(service, Some(status.as_u16()), message))
}

pub(crate) fn decode_error(service: &str, error: reqwest::Error) -> BridgeError {
    BridgeError::upstream(
        service,
        None,
        format!("invalid response body: {}", error.without_url()),
    )
}
