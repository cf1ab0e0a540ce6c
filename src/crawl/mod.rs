// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first crawling starting from a URL
// - Same-host restriction when recursing (external links are only probed)
// - Every URL is checked at most once, tracked by the registry
// - Polite crawling with a delay before each page fetch
//
// Submodules:
// - registry: Thread-safe map from normalized URL to its LinkRecord
// - traverse: The crawler itself and the top-level check() entry point
// =============================================================================

mod registry;
mod traverse;

// Re-export the main crawling function
pub use traverse::check;
