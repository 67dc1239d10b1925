//! Errors raised while fetching a batch of articles.
//!
//! Every variant is recoverable: the feed controller turns it into a
//! user-facing message and halts the current language session.  The binary
//! itself uses [`anyhow`] for startup and terminal failures.

use thiserror::Error;

/// Why a batch could not be produced.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The random-page discovery call returned no candidate identifiers.
    #[error("No articles found")]
    EmptyResult,

    /// The response did not have the expected `query.pages` structure.
    #[error("Failed to fetch article details")]
    MalformedResponse,

    /// Transport-level failure (DNS, TLS, non-2xx status, ...) on either call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
