use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemMediaStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use comics_server::accounts::SeaOrmAccountStore;
use comics_server::catalog::{CatalogService, SeaOrmCatalogStore};
use comics_server::config::AppConfig;
use comics_server::database::{ensure_indexes, init_db};
use comics_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    ensure_indexes(&db).await?;
    info!("Database ready");

    let media = FilesystemMediaStore::new(
        config.storage.media_root.clone(),
        config.storage.max_image_size,
    )
    .await
    .context("Failed to initialize media root")?;
    tokio::fs::create_dir_all(&config.storage.upload_dir)
        .await
        .context("Failed to create upload directory")?;
    info!(
        media_root = %config.storage.media_root.display(),
        max_image_size = config.storage.max_image_size,
        "Media store ready"
    );

    let catalog = CatalogService::new(
        Arc::new(SeaOrmCatalogStore::new(db.clone())),
        Arc::new(media),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config,
        catalog,
        accounts: Arc::new(SeaOrmAccountStore::new(db)),
    };

    let app = comics_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
