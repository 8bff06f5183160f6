use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendwatch_core::{
    load_config, validate_config, AnthropicClient, CollectionScheduler, LlmTrendResearcher,
    SqliteTrendStore, TrendCollector, TrendResearcher, TrendStore,
};
use trendwatch_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fallback source for the provider key when the config has none.
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
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

    // Determine config path
    let config_path = std::env::var("TRENDWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    if config.research.api_key.as_deref().is_none_or(str::is_empty) {
        config.research.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    }

    // Fingerprint of the effective config (secrets included) for correlating logs
    let config_json = serde_json::to_string(&config).context("Failed to serialize config")?;
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );
    info!("Database path: {:?}", config.database.path);

    // Create SQLite store
    let store: Arc<dyn TrendStore> = Arc::new(
        SqliteTrendStore::new(&config.database.path).context("Failed to open trend store")?,
    );
    info!("Trend store initialized");

    let seeded = seed_genres(store.as_ref(), &config.collection.seed_genres)?;
    if seeded > 0 {
        info!(count = seeded, "Seed genres ensured");
    }

    // Create research provider client
    let client = match config.research.api_key.as_deref() {
        Some(key) => {
            info!(model = %config.research.model, "Initializing Anthropic research client");
            AnthropicClient::new(key, &config.research.model)
        }
        None => {
            warn!(
                "No research API key configured (research.api_key or {}); collection will report no_data",
                API_KEY_ENV
            );
            AnthropicClient::unconfigured(&config.research.model)
        }
    }
    .with_api_base(&config.research.api_base);

    let researcher: Arc<dyn TrendResearcher> =
        Arc::new(LlmTrendResearcher::new(Arc::new(client), &config.research));

    let collector = Arc::new(
        TrendCollector::new(Arc::clone(&store), researcher)
            .with_max_concurrent_genres(config.collection.max_concurrent_genres),
    );

    // Start scheduler if enabled
    let scheduler = if config.collection.schedule_enabled {
        let scheduler = CollectionScheduler::new(
            Arc::clone(&collector),
            Duration::from_secs(config.collection.interval_secs),
        );
        scheduler.start();
        Some(scheduler)
    } else {
        info!("Scheduled collection disabled in config");
        None
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, collector));

    // Create router
    let app = create_router(state);

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

    if let Some(scheduler) = scheduler {
        scheduler.stop();
    }

    info!("Server shut down");
    Ok(())
}

/// Ensure every non-blank seed genre exists. Returns how many were ensured.
fn seed_genres(store: &dyn TrendStore, names: &[String]) -> Result<usize> {
    let mut seeded = 0;
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        store
            .ensure_genre(name)
            .with_context(|| format!("Failed to seed genre {:?}", name))?;
        seeded += 1;
    }
    Ok(seeded)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
