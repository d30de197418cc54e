use formsign_core::config::BridgeConfig;
use formsign_core::types::HttpResult;
use formsign_lambda::{Handler, ProxyRequest};
use lambda_runtime::{service_fn, Error, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    // Configuration problems stop the function at cold start
    let config = BridgeConfig::from_env()?;
    tracing::info!(profile = %config.profile, "Configuration loaded");
    let handler = Handler::from_config(&config)?;
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ProxyRequest>| async move {
        lambda_handler(handler, event).await
    }))
    .await
}

#[tracing::instrument(skip(handler, event), fields(req_id = %event.context.request_id))]
async fn lambda_handler(
    handler: &Handler,
    event: LambdaEvent<ProxyRequest>,
) -> Result<HttpResult, Error> {
    Ok(handler.handle_event(event.payload).await)
}
