use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use charter_api::{app, state::{AppState, Backend, Settings}};
use charter_store::{BackendMode, Config, InMemoryBackend, RemoteBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charter_api=debug,charter_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting charter console on port {}", config.server.port);

    let backend = match config.backend.mode {
        BackendMode::Memory => {
            tracing::warn!("Using in-memory backend; data is lost on restart");
            Backend::shared(Arc::new(InMemoryBackend::seeded()))
        }
        BackendMode::Remote => {
            let remote = RemoteBackend::new(
                &config.backend.base_url,
                Duration::from_secs(config.backend.timeout_seconds),
            )
            .context("Failed to build HTTP client")?;
            tracing::info!("Using backing service at {}", config.backend.base_url);
            Backend::shared(Arc::new(remote))
        }
    };

    let settings = Settings::from_config(&config).context("Invalid operations settings")?;
    let app_state = AppState::new(backend, settings);

    if let Err(e) = app_state.lifecycle.lock().await.refresh().await {
        tracing::warn!("Initial flight list load failed: {}", e.user_message());
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
