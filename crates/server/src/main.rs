use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex_core::{
    create_authenticator, create_service, load_config, validate_config, Authenticator,
    CatalogBackend, CatalogStore, CatalogSync, PokeApiClient, PokemonSource, SqliteCatalog,
    SyncScheduler,
};
use pokedex_server::{api::create_router, state::AppState};

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
    let config_path = std::env::var("POKEDEX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Auth method: {}", config.auth.method.as_str());
    info!("Database path: {:?}", config.database.path);

    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    let catalog: Arc<dyn CatalogStore> = Arc::new(
        SqliteCatalog::new(&config.database.path).context("Failed to open Pokemon catalog")?,
    );
    info!("Pokemon catalog initialized");

    let source: Arc<dyn PokemonSource> = Arc::new(
        PokeApiClient::new(&config.pokeapi).context("Failed to create PokeAPI client")?,
    );
    info!("PokeAPI client targeting {}", config.pokeapi.base_url);

    let service = create_service(&config.catalog, Arc::clone(&catalog), Arc::clone(&source));

    // The scheduler only feeds the store backend
    let scheduler = match config.catalog.backend {
        CatalogBackend::Store => {
            let sync = Arc::new(CatalogSync::new(Arc::clone(&source), Arc::clone(&catalog)));
            let scheduler = Arc::new(SyncScheduler::new(config.sync.clone(), sync));
            if config.sync.enabled {
                scheduler.start().await;
            } else {
                info!("Scheduled sync disabled in config");
            }
            Some(scheduler)
        }
        CatalogBackend::Live => {
            info!("Live backend selected, sync scheduler not created");
            None
        }
    };

    let state = Arc::new(AppState::new(
        config.clone(),
        authenticator,
        catalog,
        service,
        scheduler.clone(),
    ));

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown. A sync in flight (including one
    // behind POST /sync/run) is told to wrap up before connections drain.
    let draining_scheduler = scheduler.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        if let Some(scheduler) = draining_scheduler {
            scheduler.request_stop();
        }
    })
    .await
    .context("Server error")?;

    info!("Server shutting down...");

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }

    Ok(())
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
}
