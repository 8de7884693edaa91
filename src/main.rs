use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use study_assistant::{
    api::{self, AppState},
    config::AppConfig,
    registry::ComponentRegistry,
    StudyAssistant,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // -----------------------------
    // Shared state
    // -----------------------------
    let assistant = Arc::new(StudyAssistant::from_config(&config));
    let registry = ComponentRegistry::standard()?;

    match &config.delegate {
        Some(delegate) => info!(
            model = %delegate.model,
            base_url = %delegate.base_url,
            timeout = ?config.delegate_timeout,
            "model delegate enabled"
        ),
        None => info!("no delegate api key set, answering from local templates"),
    }

    let app = api::app(AppState {
        assistant,
        registry,
    });

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("HTTP listening on http://{}", config.bind_addr);
    info!("Ask endpoint at http://{}/api/ask", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
