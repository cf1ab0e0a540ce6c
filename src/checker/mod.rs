// src/checker/mod.rs
// =============================================================================
// This module contains the per-link building blocks of the crawl.
//
// Submodules:
// - normalize: Turns a URL string into the key used for deduplication
// - html: Extracts links from HTML pages
// - http: Makes HTTP requests to check if links are alive
//
// The crawl module strings these together; nothing in here keeps state
// between calls.
// =============================================================================

mod html;
mod http;
mod normalize;

// Re-export public items from submodules
// This lets users write `checker::probe()` instead of `checker::http::probe()`
pub use html::extract_links_from_stream;
pub use http::{build_client, describe_error, probe, LinkRecord};
pub use normalize::normalize;
