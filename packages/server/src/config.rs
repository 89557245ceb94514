use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Marketplace API token. Optional at startup so the service can come
    /// up without it; a sync run without the token is recorded as failed.
    pub replicate_api_token: Option<String>,
    /// Six-field cron expression for scheduled syncs. Daily at midnight UTC
    /// by default.
    pub sync_cron: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            replicate_api_token: env::var("REPLICATE_API_TOKEN").ok(),
            sync_cron: env::var("SYNC_CRON").unwrap_or_else(|_| "0 0 0 * * *".to_string()),
        })
    }
}
