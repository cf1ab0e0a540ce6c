// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Builds the one shared HTTP client used for the whole crawl
// - Probes a single link with a GET request and records the outcome
// - Turns reqwest errors into readable messages (including their causes)
//
// A probe never fails: network problems become part of the LinkRecord so
// they can show up in the final summary.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Option<T>: A record has an error or it doesn't
// - The Error trait's source() chain
// =============================================================================

use std::error::Error;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

// Sent with every request so site owners can tell who is crawling them
const USER_AGENT: &str = concat!("weasel/", env!("CARGO_PKG_VERSION"));

// Represents what we know about a single URL after checking it
//
// Invariant: status_code == 0 exactly when error is Some
#[derive(Debug, Clone, Serialize)]
pub struct LinkRecord {
    /// The URL as it was discovered (not normalized)
    pub url: Url,
    /// HTTP status code, or 0 if no response was obtained
    pub status_code: u16,
    /// Transport error message, if the request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Normalized URL of the page the link was found on (empty for the root)
    pub parent: String,
    /// True once the URL has been fetched as a page, not just probed
    #[serde(skip)]
    pub traversed: bool,
}

impl LinkRecord {
    // A successful page fetch
    pub fn page(url: Url, parent: String) -> Self {
        LinkRecord {
            url,
            status_code: StatusCode::OK.as_u16(),
            error: None,
            parent,
            traversed: true,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.status_code == StatusCode::OK.as_u16()
    }
}

// Creates the HTTP client shared by page fetches and probes
//
// Client is cheap to clone (it's an Arc internally), so one client gives us
// connection pooling across the whole crawl.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

// Checks a single link
//
// Parameters:
//   client: shared reqwest client
//   url: the link to check
//   source_page: normalized URL of the page the link was found on
//
// Returns: LinkRecord with the status code or the error
#[instrument(level = "debug", skip(client, url, source_page), fields(url = %url))]
pub async fn probe(client: &Client, url: Url, source_page: &str) -> LinkRecord {
    let parent = source_page.to_string();

    // Email links can't be checked over HTTP, treat them as fine
    if url.scheme() == "mailto" {
        return LinkRecord {
            url,
            status_code: StatusCode::OK.as_u16(),
            error: None,
            parent,
            traversed: false,
        };
    }

    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            debug!(status_code, "probe finished");
            // Only the status matters; dropping the response closes the body
            // instead of waiting for it to download
            drop(response);
            LinkRecord {
                url,
                status_code,
                error: None,
                parent,
                traversed: false,
            }
        }
        Err(e) => {
            let message = describe_error(&e);
            debug!(error = %message, "probe failed");
            LinkRecord {
                url,
                status_code: 0,
                error: Some(message),
                parent,
                traversed: false,
            }
        }
    }
}

// Renders an error together with its causes
//
// reqwest's top-level message is usually just "error sending request for
// url (...)"; the useful part ("Connection refused") lives in source().
pub fn describe_error(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why GET and not HEAD?
//    - Plenty of servers answer HEAD with 405 or 404 even when the page works
//    - GET gives the status real visitors would see
//
// 2. What is #[instrument]?
//    - A tracing macro that wraps the function in a span
//    - Every log event inside it carries the url field automatically
//
// 3. Why store the error as a String?
//    - reqwest::Error can't be cloned, but registry records are cloned
//      whenever someone reads them
//    - A String is also trivial to serialize to JSON
//
// 4. Why drop(response) right after reading the status?
//    - The headers arrive first, the body is streamed afterwards
//    - A link to a 4 GB ISO answers 200 in milliseconds; reading the
//      body would keep the probe busy until the download or the timeout ends
// -----------------------------------------------------------------------------
