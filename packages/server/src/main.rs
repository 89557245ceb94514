// Main entry point for the model catalog sync service

mod config;
mod scheduler;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_sync::{PostgresCatalogStore, SyncReport, SyncService};
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "server", about = "Model catalog sync service")]
struct Args {
    /// Run one sync immediately and exit instead of scheduling
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_sync=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("Starting model catalog sync service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let store = Arc::new(PostgresCatalogStore::new(pool));
    let service = Arc::new(SyncService::new(store, config.replicate_api_token.clone())?);

    if args.once {
        match service.run().await? {
            SyncReport::Completed(summary) => tracing::info!(
                total = summary.counts.total(),
                duration_ms = summary.duration_ms,
                "sync finished"
            ),
            SyncReport::SkippedLocked => {
                tracing::warn!("sync skipped: another run holds the lock")
            }
        }
        return Ok(());
    }

    let _scheduler = scheduler::start_scheduler(service, &config.sync_cron).await?;

    tracing::info!("Scheduler running; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");

    Ok(())
}
