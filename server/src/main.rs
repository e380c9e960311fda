use std::sync::Arc;

use api::{
    counter::RedisCounterStore, create_router, db, models::user::SqliteUserDirectory, AppConfig,
    AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use trackbridge::{
    deezer::DeezerClientBuilder, retry::RetryPolicy, spotify::SpotifyClientBuilder, Bridge,
    CounterStore, MemoryCounterStore, PlatformsBuilder, SearchCounter,
};

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    load_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting trackbridge v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

/// Loads `.env.<ENV>` (`.env.development` when `ENV` is unset) if present.
fn load_env() {
    let env = std::env::var("ENV").unwrap_or_else(|_| "development".to_string());
    // a missing file is fine, the process environment still applies
    let _ = dotenvy::from_filename(format!(".env.{env}"));
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;

    let retry = RetryPolicy::default().with_timeout(config.upstream_timeout);
    let http = reqwest::Client::builder()
        .user_agent(concat!("trackbridge/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let deezer = DeezerClientBuilder::new()
        .base_url(&config.deezer_api_base)
        .http_client(http.clone())
        .retry(retry)
        .build()?;
    let spotify = SpotifyClientBuilder::new()
        .credentials(&config.spotify_client_id, &config.spotify_client_secret)
        .api_base(&config.spotify_api_base)
        .auth_base(&config.spotify_auth_base)
        .http_client(http)
        .retry(retry)
        .build()?;

    let platforms = PlatformsBuilder::new().add(deezer).add(spotify).build()?;
    for (platform, name) in platforms.list() {
        info!("Platform {} served by {}", platform, name);
    }

    let counter_store: Arc<dyn CounterStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisCounterStore::connect(url).await?),
        None => {
            warn!("REDIS_URL not set, search counter is process-local");
            Arc::new(MemoryCounterStore::new())
        }
    };

    let pool = db::connect(&config.database_url).await?;
    let bridge = Bridge::new(
        platforms,
        SearchCounter::new(counter_store),
        Arc::new(SqliteUserDirectory::new(pool)),
    )
    .with_search_concurrency(config.search_concurrency);

    let shutdown = CancellationToken::new();
    let app = create_router(AppState::new(bridge, shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Could not listen for shutdown signal: {}", e);
    }
    info!("Shutdown requested, closing sessions");
    shutdown.cancel();
}
