use std::sync::Arc;

use anyhow::Context;
use email_reply::api::{AppState, workflow_routes};
use email_reply::config::ServiceConfig;
use email_reply::llm::{LlmConfig, create_runtime};
use email_reply::workflow::WorkflowRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting email reply workflow API"
    );

    // The service still starts without a key; /health reports 503 until it is set.
    let api_key = match config.api_key() {
        Ok(key) => {
            tracing::info!("{} is configured", config.api_key_env);
            key
        }
        Err(e) => {
            tracing::error!(error = %e, "{} environment variable is not set", config.api_key_env);
            secrecy::SecretString::from(String::new())
        }
    };

    let runtime = create_runtime(&LlmConfig {
        api_key,
        model: config.agent.model.clone(),
    })?;

    let runner = WorkflowRunner::new(config.agent.clone(), runtime);
    let state = AppState::new(Arc::new(runner), config.api_key_env.clone());
    let app = workflow_routes(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        model = %config.agent.model,
        effort = %config.agent.model_settings.reasoning.effort,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    tracing::info!("Shutting down email reply workflow API");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
