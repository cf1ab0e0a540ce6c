// src/error.rs
// =============================================================================
// Error types for the crawl.
//
// Only `CheckError` ever reaches main.rs. Everything else is scoped to a
// single page: the crawler logs it and moves on to the next page.
// =============================================================================

use thiserror::Error;

/// Fatal errors that stop a check before any page is fetched
#[derive(Debug, Error)]
pub enum CheckError {
    /// The URL given on the command line could not be parsed
    #[error("error parsing base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The shared HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Reasons a single page is skipped during traversal
#[derive(Debug, Error)]
pub enum PageError {
    #[error("error fetching target url ({url}): {message}")]
    Fetch { url: String, message: String },

    #[error("error: http status code: {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("error extracting links from {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },
}

/// Failures while reading and tokenizing a page body
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("error reading HTML body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("page body is larger than {limit} bytes")]
    TooLarge { limit: usize },
}
