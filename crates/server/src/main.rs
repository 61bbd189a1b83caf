use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brewdex_core::{
    resolve_config, validate_config, CatalogFetcher, ChangeHub, HttpCatalogFetcher, PackageStore,
    SearchEngine, SqliteStore, SyncManager, UserDataStore,
};

use brewdex_server::{create_router, AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("brewdex {}", VERSION);

    // Load configuration
    let config_path = std::env::var("BREWDEX_CONFIG").ok().map(PathBuf::from);
    let config =
        resolve_config(config_path.as_deref()).context("Failed to load configuration")?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Database path: {:?}", config.database.path);

    // Create the local store (runs pending schema migrations)
    let store: Arc<dyn PackageStore> = Arc::new(
        SqliteStore::new(&config.database.path).context("Failed to open package store")?,
    );
    info!("Package store initialized");

    // Change hub shared by all services and the WebSocket endpoint
    let hub = ChangeHub::default();

    // Remote catalog fetcher
    let fetcher: Arc<dyn CatalogFetcher> = Arc::new(
        HttpCatalogFetcher::new(&config.sync).context("Failed to create catalog fetcher")?,
    );

    // Sync manager
    let sync_manager = Arc::new(SyncManager::new(
        config.sync.clone(),
        Arc::clone(&store),
        fetcher,
        hub.clone(),
    ));

    // User metadata service (rebuilds its mirrors from the store)
    let userdata = Arc::new(
        UserDataStore::load(Arc::clone(&store), hub.clone())
            .context("Failed to load user metadata")?,
    );

    // Query engine
    let engine = SearchEngine::new(Arc::clone(&store), Arc::clone(&userdata));

    // Kick off the startup sync; progress streams over /ws.
    {
        let sync_manager = Arc::clone(&sync_manager);
        tokio::spawn(async move {
            match sync_manager.sync(false).await {
                Ok(outcome) => info!("Startup sync finished: {:?}", outcome),
                Err(e) => warn!("Startup sync failed: {}", e),
            }
        });
    }

    // Create app state
    let app_state = Arc::new(AppState::new(
        config.clone(),
        store,
        sync_manager,
        engine,
        userdata,
        hub,
    ));

    // Create router
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
