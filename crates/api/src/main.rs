use anyhow::Result;
use tourgid_api::{build_app_with, ApiConfig};
use tourgid_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("tourgid_api");

    let config = ApiConfig::from_env();
    let app = build_app_with(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(bind = %config.bind, "tourgid api started");

    axum::serve(listener, app).await?;
    Ok(())
}
