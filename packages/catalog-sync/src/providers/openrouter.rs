//! Text-model aggregator client. The listing endpoint is public (no auth)
//! and quotes per-token prices as decimal strings; listings are scaled to
//! per-million-token prices, filtered to paid models, and ordered cheapest
//! first.

use serde::Deserialize;
use tracing::info;

use super::http_client;
use crate::error::{FetchError, FetchResult};
use crate::types::RawListing;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai";

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
struct ApiModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    pricing: Option<ApiPricing>,
    #[serde(default)]
    context_length: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiPricing {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    completion: Option<String>,
}

fn per_million(price: Option<&str>) -> f64 {
    price
        .and_then(|p| p.parse::<f64>().ok())
        .unwrap_or(0.0)
        * TOKENS_PER_MILLION
}

pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
        })
    }

    /// Fetch all paid text model listings, cheapest first.
    pub async fn fetch_text_listings(&self) -> FetchResult<Vec<RawListing>> {
        let url = format!("{}/api/v1/models", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let listings = parse_text_listings(&body)?;
        info!(count = listings.len(), "fetched text model listings");
        Ok(listings)
    }
}

fn parse_text_listings(body: &str) -> FetchResult<Vec<RawListing>> {
    let response: ListingResponse = serde_json::from_str(body)?;

    let mut listings: Vec<(f64, RawListing)> = response
        .data
        .into_iter()
        .filter_map(|model| {
            let prompt = per_million(
                model
                    .pricing
                    .as_ref()
                    .and_then(|p| p.prompt.as_deref()),
            );
            let completion = per_million(
                model
                    .pricing
                    .as_ref()
                    .and_then(|p| p.completion.as_deref()),
            );
            // Free models are not catalogued.
            if prompt <= 0.0 && completion <= 0.0 {
                return None;
            }

            let (owner, short_name) = model
                .id
                .split_once('/')
                .unwrap_or(("unknown", model.id.as_str()));

            let mut listing = RawListing::new(owner, short_name);
            listing.display_name = Some(
                model
                    .name
                    .clone()
                    .unwrap_or_else(|| short_name.to_string()),
            );
            listing.description = model.description.unwrap_or_default();
            listing.prompt_price = Some(prompt);
            listing.completion_price = Some(completion);
            listing.context_length = model.context_length;

            Some((prompt + completion, listing))
        })
        .collect();

    listings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    Ok(listings.into_iter().map(|(_, listing)| listing).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "data": [
            {
                "id": "vendor/free-model",
                "name": "Free Model",
                "pricing": {"prompt": "0", "completion": "0"}
            },
            {
                "id": "vendor/pricey-model",
                "name": "Pricey Model",
                "description": "large",
                "pricing": {"prompt": "0.00001", "completion": "0.00003"},
                "context_length": 200000
            },
            {
                "id": "vendor/cheap-model",
                "pricing": {"prompt": "0.000001", "completion": "0.000002"},
                "context_length": 8192
            }
        ]
    }"#;

    #[test]
    fn free_models_are_dropped_and_prices_scaled_per_million() {
        let listings = parse_text_listings(BODY).unwrap();
        assert_eq!(listings.len(), 2);

        let pricey = listings
            .iter()
            .find(|l| l.model_id() == "vendor/pricey-model")
            .unwrap();
        assert_eq!(pricey.prompt_price, Some(10.0));
        assert_eq!(pricey.completion_price, Some(30.0));
        assert_eq!(pricey.context_length, Some(200000));
        assert_eq!(pricey.display_name.as_deref(), Some("Pricey Model"));
    }

    #[test]
    fn listings_are_ordered_cheapest_first() {
        let listings = parse_text_listings(BODY).unwrap();
        assert_eq!(listings[0].model_id(), "vendor/cheap-model");
        assert_eq!(listings[1].model_id(), "vendor/pricey-model");
    }

    #[test]
    fn missing_api_name_falls_back_to_the_slug() {
        let listings = parse_text_listings(BODY).unwrap();
        let cheap = &listings[0];
        assert_eq!(cheap.display_name.as_deref(), Some("cheap-model"));
    }

    #[test]
    fn malformed_body_is_a_typed_error() {
        assert!(matches!(
            parse_text_listings("not json"),
            Err(FetchError::MalformedResponse(_))
        ));
    }
}
