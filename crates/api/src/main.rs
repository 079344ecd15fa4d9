use anyhow::Context;

use huddle_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    huddle_observability::init();

    let config = ApiConfig::from_env()?;
    let directory = app::services::build_directory(config.seed).context("failed to seed directory")?;
    let router = app::build_app(directory);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, seeded = config.seed, "listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
