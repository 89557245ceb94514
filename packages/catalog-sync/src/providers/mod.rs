//! Upstream catalog clients: the text-model aggregator and the hosted-model
//! marketplace. Each client maps provider responses onto uniform
//! [`RawListing`](crate::types::RawListing) values; nothing provider-shaped
//! leaks past this module.

mod openrouter;
mod replicate;

pub use openrouter::OpenRouterClient;
pub use replicate::{collections, ReplicateClient};

use std::time::Duration;

use anyhow::{Context, Result};

/// HTTP client shared by the provider clients: bounded timeout and a
/// browser-like User-Agent so marketplace page fetches are not bot-filtered.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("Failed to create HTTP client")
}
