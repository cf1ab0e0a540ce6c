// src/config.rs
// =============================================================================
// Runtime settings for a check.
//
// There are no config files or environment variables: everything comes from
// the command line (see cli.rs) and is collected here so the crawler doesn't
// need to know about clap.
// =============================================================================

use std::time::Duration;

use crate::cli::Cli;

// Pause before every page fetch to avoid 429 Too Many Requests
pub const DEFAULT_PACING_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_MAX_PAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Follow links that stay on the starting host
    pub recursive: bool,
    /// Sleep before each page fetch
    pub pacing: Duration,
    /// Per-request timeout for page fetches and probes
    pub timeout: Duration,
    /// Maximum number of probes in flight for one page
    pub concurrency: usize,
    /// Pages with a larger body are skipped without extracting links
    pub max_page_bytes: usize,
}

impl From<&Cli> for CheckConfig {
    fn from(cli: &Cli) -> Self {
        CheckConfig {
            recursive: cli.recursive,
            pacing: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout),
            // for_each_concurrent treats 0 as "no limit", which is not what --concurrency 0 means
            concurrency: cli.concurrency.max(1),
            max_page_bytes: cli.max_page_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["weasel", "http://a.test"]);
        let config = CheckConfig::from(&cli);
        assert!(!config.recursive);
        assert_eq!(config.pacing, Duration::from_millis(100));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.max_page_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_flags_are_applied() {
        let cli = Cli::parse_from([
            "weasel",
            "-r",
            "--delay-ms",
            "0",
            "--timeout",
            "3",
            "--concurrency",
            "0",
            "http://a.test",
        ]);
        let config = CheckConfig::from(&cli);
        assert!(config.recursive);
        assert_eq!(config.pacing, Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.concurrency, 1);
    }
}
