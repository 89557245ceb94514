//! Hosted-model marketplace client. Collection and detail endpoints are
//! token-authenticated JSON; the public model pages double as the fallback
//! pricing source for the page-scraping strategies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::http_client;
use crate::error::{FetchError, FetchResult};
use crate::traits::ModelPageFetcher;
use crate::types::{BillingConfig, RawListing};

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com";
pub const DEFAULT_SITE_BASE: &str = "https://replicate.com";

/// Curated marketplace collections harvested per category.
pub mod collections {
    pub const TEXT_TO_IMAGE: &str = "text-to-image";
    pub const TEXT_TO_VIDEO: &str = "text-to-video";
    pub const SPEECH_RECOGNITION: &str = "speech-recognition";
    pub const TEXT_TO_SPEECH: &str = "text-to-speech";
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    models: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
struct ApiModel {
    owner: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    run_count: u64,
    #[serde(default)]
    latest_version: Option<ApiVersion>,
    #[serde(default)]
    billing_config: Option<BillingConfig>,
}

#[derive(Debug, Deserialize)]
struct ApiVersion {
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ApiModel {
    fn into_listing(self) -> RawListing {
        let mut listing = RawListing::new(self.owner, self.name);
        listing.description = self.description.unwrap_or_default();
        listing.run_count = self.run_count;
        listing.updated_at = self.latest_version.and_then(|v| v.created_at);
        listing.billing = self.billing_config;
        listing
    }
}

pub struct ReplicateClient {
    client: reqwest::Client,
    api_base: String,
    site_base: String,
    token: String,
}

impl ReplicateClient {
    pub fn new(token: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_base_urls(token, DEFAULT_API_BASE, DEFAULT_SITE_BASE)
    }

    pub fn with_base_urls(
        token: impl Into<String>,
        api_base: impl Into<String>,
        site_base: impl Into<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_base: api_base.into(),
            site_base: site_base.into(),
            token: token.into(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
    }

    /// Fetch one curated collection's model listings.
    pub async fn fetch_collection(&self, slug: &str) -> FetchResult<Vec<RawListing>> {
        let url = format!("{}/v1/collections/{}", self.api_base, slug);
        let response = self.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let listings = parse_collection(&body)?;
        info!(slug, count = listings.len(), "fetched marketplace collection");
        Ok(listings)
    }

    /// Fetch the per-model detail record for its billing configuration. Any
    /// failure degrades to `None`; the price resolver has further fallbacks.
    pub async fn fetch_model_detail(&self, owner: &str, name: &str) -> Option<BillingConfig> {
        let url = format!("{}/v1/models/{}/{}", self.api_base, owner, name);
        let response = match self.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(owner, name, error = %e, "model detail fetch failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(owner, name, status = %response.status(), "model detail fetch rejected");
            return None;
        }
        let detail: ApiModel = match response.json().await {
            Ok(detail) => detail,
            Err(e) => {
                debug!(owner, name, error = %e, "model detail body malformed");
                return None;
            }
        };
        detail.billing_config
    }
}

#[async_trait]
impl ModelPageFetcher for ReplicateClient {
    async fn fetch_page(&self, owner: &str, name: &str) -> FetchResult<String> {
        let url = format!("{}/{}/{}", self.site_base, owner, name);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }
}

fn parse_collection(body: &str) -> FetchResult<Vec<RawListing>> {
    let response: CollectionResponse = serde_json::from_str(body)?;
    Ok(response
        .models
        .into_iter()
        .map(ApiModel::into_listing)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_listings_carry_identity_and_popularity() {
        let body = r#"{
            "models": [
                {
                    "owner": "stability-ai",
                    "name": "sdxl",
                    "description": "A text-to-image model",
                    "run_count": 75000000,
                    "latest_version": {"created_at": "2024-07-01T12:00:00Z"}
                },
                {
                    "owner": "black-forest-labs",
                    "name": "flux-schnell",
                    "run_count": 120000000
                }
            ]
        }"#;

        let listings = parse_collection(body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].model_id(), "stability-ai/sdxl");
        assert_eq!(listings[0].run_count, 75_000_000);
        assert!(listings[0].updated_at.is_some());
        assert!(listings[1].updated_at.is_none());
        assert!(listings[1].description.is_empty());
    }

    #[test]
    fn detail_billing_config_is_attached_when_present() {
        let body = r#"{
            "models": [
                {
                    "owner": "a",
                    "name": "m",
                    "run_count": 10,
                    "billing_config": {
                        "billing_type": "usage",
                        "current_tiers": [{"price": 0.01, "unit": "per image"}]
                    }
                }
            ]
        }"#;

        let listings = parse_collection(body).unwrap();
        let billing = listings[0].billing.as_ref().unwrap();
        assert_eq!(billing.current_tiers.len(), 1);
    }

    #[test]
    fn malformed_collection_is_a_typed_error() {
        assert!(matches!(
            parse_collection(r#"{"models": "nope"}"#),
            Err(FetchError::MalformedResponse(_))
        ));
    }
}
