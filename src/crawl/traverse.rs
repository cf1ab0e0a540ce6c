// src/crawl/traverse.rs
// =============================================================================
// This module walks a website depth-first and checks every link it finds.
//
// How it works, for each page:
// 1. Skip it if it was already fetched as a page
// 2. Wait a little (polite crawling), then GET it
// 3. Record it in the registry and extract its <a href> links
// 4. Probe every link we haven't seen before, concurrently
// 5. Once ALL probes are done, descend into links on the same host
//
// Depth-first order is kept with an explicit stack instead of recursion, so
// deep sites can't overflow the call stack. Children are pushed in reverse,
// which makes the first link on a page the next one visited.
//
// Failures on one page (network error, non-200, unreadable body) skip that
// page only. Failed links are recorded and reported, never fatal.
// =============================================================================

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::checker::{self, describe_error, extract_links_from_stream, normalize, LinkRecord};
use crate::config::CheckConfig;
use crate::error::{CheckError, PageError};
use crate::report::{Reporter, Summary};

use super::registry::Registry;

pub struct Crawler<'a> {
    client: Client,
    config: CheckConfig,
    registry: Registry,
    reporter: &'a Reporter,
}

impl<'a> Crawler<'a> {
    pub fn new(config: CheckConfig, reporter: &'a Reporter) -> Result<Self, CheckError> {
        let client = checker::build_client(config.timeout)?;
        Ok(Crawler {
            client,
            config,
            registry: Registry::new(),
            reporter,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // Crawls from `target`, following same-host links when recursive
    pub async fn run(&self, target: Url) {
        let mut pending = vec![target];

        while let Some(page) = pending.pop() {
            let to_check = match self.visit(&page).await {
                Ok(links) => links,
                Err(e) => {
                    error!("{}", e);
                    continue;
                }
            };

            if self.config.recursive {
                pending.extend(
                    to_check
                        .into_iter()
                        .rev()
                        .filter(|link| is_same_host(&page, link)),
                );
            }
        }

        info!(records = self.registry.len(), errors = self.registry.errors(), "crawl finished");
    }

    // Fetches one page and probes its links
    //
    // Returns the links that were newly probed on this page, in the order
    // they appear in the HTML. These are the recursion candidates.
    async fn visit(&self, target: &Url) -> Result<Vec<Url>, PageError> {
        let page_key = normalize(target.as_str());

        let previous = self.registry.get(&page_key);
        if previous.as_ref().is_some_and(|record| record.traversed) {
            self.reporter.seen(&page_key);
            return Ok(Vec::new());
        }

        // avoid 429 status codes
        if !self.config.pacing.is_zero() {
            tokio::time::sleep(self.config.pacing).await;
        }

        self.reporter.checking(&page_key);

        let response = self
            .client
            .get(page_key.as_str())
            .send()
            .await
            .map_err(|e| PageError::Fetch {
                url: page_key.clone(),
                message: describe_error(&e),
            })?;

        if response.status() != StatusCode::OK {
            return Err(PageError::Status {
                url: page_key,
                status: response.status().as_u16(),
            });
        }

        // Keep the parent if this page was first seen as a link somewhere else
        let parent = previous.map(|record| record.parent).unwrap_or_default();
        self.registry
            .set(page_key.clone(), LinkRecord::page(target.clone(), parent));

        let links = extract_links_from_stream(response.bytes_stream(), target, self.config.max_page_bytes)
            .await
            .map_err(|source| PageError::Extract {
                url: page_key.clone(),
                source,
            })?;

        if links.is_empty() {
            self.reporter.no_links();
            return Ok(Vec::new());
        }

        let to_check = self.unseen_links(links);
        debug!(page = %page_key, links = to_check.len(), "probing links");

        stream::iter(to_check.iter().cloned())
            .for_each_concurrent(self.config.concurrency, |link| self.check_link(link, &page_key))
            .await;

        Ok(to_check)
    }

    // Filters extracted links down to the ones the registry doesn't know yet
    //
    // Links that normalize to the same key (e.g. "/x" and "/x/") are kept
    // only once, so each gets exactly one probe.
    fn unseen_links(&self, links: Vec<String>) -> Vec<Url> {
        let mut keys = HashSet::new();
        let mut to_check = Vec::new();

        for link in links {
            let key = normalize(&link);
            if self.registry.contains(&key) || !keys.insert(key) {
                continue;
            }
            match Url::parse(&link) {
                Ok(url) => to_check.push(url),
                Err(e) => warn!(link = %link, error = %e, "error parsing url"),
            }
        }

        to_check
    }

    async fn check_link(&self, link: Url, page_key: &str) {
        let key = normalize(link.as_str());

        // Defensive recheck: pages are visited one at a time and unseen_links
        // already dropped duplicate keys, so this should not trigger
        if self.registry.contains(&key) {
            self.reporter.seen(&key);
            return;
        }

        let record = checker::probe(&self.client, link, page_key).await;
        self.reporter.link(&record);
        self.registry.set(key, record);
    }
}

// Hostnames compared as plain strings; ports and schemes are ignored
fn is_same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str()
}

// Runs a complete check: parse the URL, crawl, print the summary
//
// The registry lives exactly as long as this call.
pub async fn check(target: &str, config: CheckConfig, reporter: &Reporter) -> Result<Summary, CheckError> {
    let target_url = Url::parse(target).map_err(|source| CheckError::InvalidBaseUrl {
        url: target.to_string(),
        source,
    })?;

    let crawler = Crawler::new(config, reporter)?;
    crawler.run(target_url).await;

    let summary = Summary::from_snapshot(crawler.registry().snapshot());
    reporter.summary(&summary);
    Ok(summary)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is for_each_concurrent?
//    - Runs a future for every item in a stream, up to N at the same time
//    - The .await only finishes when every one of them has finished
//    - That's what guarantees "all probes before recursion"
//
// 2. Why a Vec as a stack instead of a recursive async fn?
//    - An async fn can't call itself directly (its future would have
//      infinite size); it needs Box::pin
//    - A Vec used with push/pop gives the same depth-first order and
//      never grows the call stack
//
// 3. What is the 'a on Crawler<'a>?
//    - The crawler borrows the Reporter instead of owning it
//    - 'a says the crawler can't outlive the reporter it points to
//
// 4. What does map_err do?
//    - Converts the error inside a Result into a different error type
//    - Here it wraps reqwest/extractor errors into PageError variants
// -----------------------------------------------------------------------------
