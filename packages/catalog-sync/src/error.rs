//! Typed errors for the fetch layer.
//!
//! Provider clients return `FetchError` so callers can distinguish transport
//! failures from upstream rejections; everything above the client boundary
//! uses `anyhow` with context.

use thiserror::Error;

/// Errors from one upstream HTTP call. Every variant is recoverable at some
/// layer: detail/page fetches degrade to "no data", listing fetches degrade
/// to an empty category contribution.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Transport-level failure (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body was not the JSON shape the provider documents
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

pub type FetchResult<T> = Result<T, FetchError>;
