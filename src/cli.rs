// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage: weasel [--recursive|-r] <url>
// =============================================================================

use clap::{ArgAction, Parser};

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_MAX_PAGE_BYTES, DEFAULT_PACING_MS, DEFAULT_TIMEOUT_SECS};

// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "weasel",
    version,
    about = "check for broken links",
    long_about = "weasel fetches a web page, checks every link on it and reports the ones \
                  that are unreachable or don't answer 200 OK. With --recursive it keeps \
                  going through pages on the same host."
)]
pub struct Cli {
    /// Page to start checking from (e.g., https://example.com)
    ///
    /// Optional so that running `weasel` on its own prints help instead of an error
    pub url: Option<String>,

    /// Recursively check links within the same domain
    #[arg(short, long)]
    pub recursive: bool,

    /// Print the final summary as JSON on stdout (progress goes to stderr)
    #[arg(long)]
    pub json: bool,

    /// Milliseconds to wait before fetching each page
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_PACING_MS)]
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum number of links checked at once on a page
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Largest page body (in bytes) read when looking for links
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_PAGE_BYTES)]
    pub max_page_bytes: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_optional() {
        let cli = Cli::parse_from(["weasel"]);
        assert!(cli.url.is_none());
        assert!(!cli.recursive);
    }

    #[test]
    fn test_short_and_long_recursive() {
        let short = Cli::parse_from(["weasel", "-r", "https://example.com"]);
        let long = Cli::parse_from(["weasel", "--recursive", "https://example.com"]);
        assert!(short.recursive && long.recursive);
        assert_eq!(short.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::parse_from(["weasel", "-vv", "https://example.com"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
