use std::sync::Arc;

use beerleo_api::config::AppConfig;
use beerleo_api::router::build_app_router;
use beerleo_api::server::{serve_with_grace, shutdown_signal};
use beerleo_api::state::AppState;
use beerleo_core::image_store::LocalImageStore;
use beerleo_db::repositories::BeerRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Environment file (first argument, default `.env.dev`) ---
    let env_file = std::env::args().nth(1).unwrap_or_else(|| ".env.dev".to_string());
    let env_loaded = dotenvy::from_filename(&env_file).is_ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beerleo_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !env_loaded {
        tracing::warn!(file = %env_file, "Env file not loaded, using process environment");
    }

    // --- Configuration ---
    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(addr = %config.app().url(), name = config.app().name(), "Loaded configuration");

    // --- Database ---
    let pool = beerleo_db::create_pool(config.db().url(), config.db().max_connections()).await?;
    tracing::info!("Database connection pool created");

    beerleo_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    beerleo_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Image store ---
    let images = LocalImageStore::new(config.app().upload_root());
    tokio::fs::create_dir_all(images.uploads_dir()).await?;
    tracing::info!(root = %images.root().display(), "Image store ready");

    // --- App state ---
    let state = AppState::new(
        Arc::clone(&config),
        Arc::new(BeerRepo::new(pool.clone())),
        Arc::new(images),
    );
    let app = build_app_router(state, &config);

    // --- Start server ---
    let listener = tokio::net::TcpListener::bind(config.app().url()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Starting server");

    let served = serve_with_grace(
        listener,
        app,
        shutdown_signal(),
        config.app().shutdown_timeout(),
    )
    .await;

    // --- Post-shutdown cleanup ---
    pool.close().await;
    tracing::info!("Database pool closed");

    if let Err(e) = served {
        tracing::error!(error = %e, "Server forced to shutdown");
        return Err(e.into());
    }

    tracing::info!("Server exiting");
    Ok(())
}
