//! Nimbus server entry point.
//!
//! Loads configuration, connects the metadata store, runs migrations,
//! selects a blob store provider, and wires the mutation services.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use nimbus_core::config::AppConfig;
use nimbus_core::error::AppError;
use nimbus_core::traits::blob::BlobStore;
use nimbus_database::DatabasePool;
use nimbus_database::repositories::{
    PgActivityRepository, PgClipboardRepository, PgFileRepository, PgFolderRepository,
    PgPermissionRepository, PgVersionRepository,
};
use nimbus_service::share::TokenGenerator;
use nimbus_service::{
    ActivityLogger, ClipboardService, SagaOrchestrator, ShareService, VersionLedger,
};
use nimbus_storage::providers::local::LocalBlobStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("NIMBUS_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Build the configured blob store provider.
async fn build_blob_store(config: &AppConfig) -> Result<Arc<dyn BlobStore>, AppError> {
    match config.storage.provider.as_str() {
        "local" => Ok(Arc::new(LocalBlobStore::new(&config.storage.local).await?)),
        #[cfg(feature = "s3")]
        "s3" => Ok(Arc::new(
            nimbus_storage::providers::s3::S3BlobStore::new(&config.storage.s3).await?,
        )),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider '{}'",
            other
        ))),
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Nimbus v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    nimbus_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    tracing::info!(provider = %config.storage.provider, "Initializing blob store...");
    let blob = build_blob_store(&config).await?;
    if !blob.health_check().await? {
        return Err(AppError::storage("Blob store health check failed"));
    }
    tracing::info!("Blob store ready");

    let pool = db.pool().clone();
    let files = Arc::new(PgFileRepository::new(pool.clone()));
    let folders = Arc::new(PgFolderRepository::new(pool.clone()));
    let permissions = Arc::new(PgPermissionRepository::new(pool.clone()));
    let versions = Arc::new(PgVersionRepository::new(pool.clone()));
    let clipboard_entries = Arc::new(PgClipboardRepository::new(pool.clone()));
    let activity = Arc::new(PgActivityRepository::new(pool));

    let logger = ActivityLogger::new(activity);
    let ledger = Arc::new(VersionLedger::new(versions));
    let shares = Arc::new(ShareService::new(
        files.clone(),
        permissions.clone(),
        TokenGenerator::new(),
        logger.clone(),
    ));
    let saga = Arc::new(SagaOrchestrator::new(
        files.clone(),
        folders.clone(),
        permissions,
        Arc::clone(&ledger),
        blob,
        TokenGenerator::new(),
        Arc::clone(&shares),
        logger.clone(),
    ));
    let clipboard = ClipboardService::new(clipboard_entries, files, folders, Arc::clone(&saga));

    tracing::info!(orchestrator = ?saga, clipboard = ?clipboard, "Services initialized");
    tracing::info!("Nimbus is ready");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, closing connections...");
    db.close().await;
    tracing::info!("Nimbus shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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
