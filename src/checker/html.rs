// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever (Mozilla's HTML parser), so broken markup is
//   recovered the way a browser would instead of aborting
//
// We also use the `url` crate to:
// - Resolve relative hrefs against the page they were found on
//
// Only <a href="..."> is considered. mailto: links are dropped here so they
// never reach the network layer.
//
// Rust concepts:
// - Generic functions: the body reader works with any byte stream
// - Iterators: walking every node of the document tree
// =============================================================================

use std::error::Error;
use std::pin::pin;

use futures::{Stream, StreamExt};
use scraper::Html;
use tracing::debug;
use url::Url;

use crate::error::ExtractError;

// Reads a page body chunk by chunk, then extracts its links
//
// Parameters:
//   body: any stream of byte chunks (e.g. reqwest's bytes_stream())
//   base_url: the page URL, used to resolve relative hrefs
//   max_bytes: reading stops with ExtractError::TooLarge past this size
//
// Returns: the absolute URLs in document order, or ExtractError if the
// body stream fails before it is fully read
pub async fn extract_links_from_stream<S, B, E>(
    body: S,
    base_url: &Url,
    max_bytes: usize,
) -> Result<Vec<String>, ExtractError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    let mut body = pin!(body);
    let mut buffer = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ExtractError::Body(e.into()))?;
        let chunk = chunk.as_ref();
        // Same-host links can point at downloads, not just pages
        if buffer.len() + chunk.len() > max_bytes {
            return Err(ExtractError::TooLarge { limit: max_bytes });
        }
        buffer.extend_from_slice(chunk);
    }

    // Pages with a bad byte here and there still have usable links
    let html = String::from_utf8_lossy(&buffer);
    Ok(extract_html_links(&html, base_url))
}

// Extracts all anchor links from HTML content
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();
    let document = Html::parse_document(html);

    for node in document.root_element().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if element.name() != "a" {
            continue;
        }

        for (key, value) in element.attrs() {
            if key != "href" {
                continue;
            }
            if let Some(absolute_url) = resolve_href(base_url, value) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Resolves one href against the page URL
//
// Returns None (and reports on stderr) when the href is not a valid URL
// reference, and None for mailto: targets
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let absolute = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Invalid URL: {} - {}", href, e);
            debug!(href, base = %base, error = %e, "skipping unparsable href");
            return None;
        }
    };

    if absolute.scheme() == "mailto" {
        return None;
    }

    Some(absolute.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why walk the tree instead of using a CSS selector?
//    - Selector::parse returns a Result, and we don't want an unwrap() here
//    - Walking descendants() visits every node in document order, which is
//      exactly the order the crawler needs for depth-first recursion
//
// 2. What does base.join() do?
//    - It resolves an href like a browser would
//    - "https://example.com/page/" + "../other" = "https://example.com/other"
//    - An absolute href ignores the base entirely
//
// 3. What is pin!?
//    - Streams must be pinned before .next() can be called on them
//    - pin! pins the stream to the stack so no heap allocation is needed
//
// 4. What is from_utf8_lossy?
//    - Converts bytes to text, replacing invalid sequences with '�'
//    - Returns a Cow: borrowed if the bytes were already valid UTF-8
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_html_links(html, &base("https://example.com"));
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_html_links(html, &base("https://example.com/page"));
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_skip_mailto() {
        let html = r#"<a href="mailto:test@example.com">Email</a>"#;
        let links = extract_html_links(html, &base("https://example.com"));
        assert!(links.is_empty());
    }

    #[test]
    fn test_only_anchor_hrefs_in_document_order() {
        let html = r#"
            <link href="/style.css" rel="stylesheet">
            <a href="https://rust-lang.org">Rust</a>
            <img src="/logo.png">
            <A HREF="/docs">Docs</A>
            <a name="no-href">Anchor</a>
            <a href="../about"/>
        "#;
        let links = extract_html_links(html, &base("https://example.com/page/"));
        assert_eq!(
            links,
            vec![
                "https://rust-lang.org/",
                "https://example.com/docs",
                "https://example.com/about",
            ]
        );
    }

    #[test]
    fn test_unparsable_href_is_skipped() {
        let html = r#"<a href="http://[::1">bad</a><a href="/good">good</a>"#;
        let links = extract_html_links(html, &base("https://example.com"));
        assert_eq!(links, vec!["https://example.com/good"]);
    }

    #[test]
    fn test_fragment_link_keeps_fragment() {
        let html = r##"<a href="#section">Jump</a>"##;
        let links = extract_html_links(html, &base("https://example.com/page"));
        assert_eq!(links, vec!["https://example.com/page#section"]);
    }

    #[tokio::test]
    async fn test_stream_chunks_are_joined_before_parsing() {
        let chunks: Vec<Result<&[u8], std::io::Error>> =
            vec![Ok(b"<a hr".as_slice()), Ok(b"ef=\"/split\">x</a>".as_slice())];
        let links = extract_links_from_stream(stream::iter(chunks), &base("http://a.test/"), 1024)
            .await
            .unwrap();
        assert_eq!(links, vec!["http://a.test/split"]);
    }

    #[tokio::test]
    async fn test_body_over_limit_fails_extraction() {
        let chunks: Vec<Result<&[u8], std::io::Error>> =
            vec![Ok(b"<a href=\"/x\">x</a>".as_slice()), Ok(b"<a href=\"/y\">y</a>".as_slice())];
        let result = extract_links_from_stream(stream::iter(chunks), &base("http://a.test/"), 20).await;
        assert!(matches!(result, Err(ExtractError::TooLarge { limit: 20 })));
    }

    #[tokio::test]
    async fn test_stream_error_fails_extraction() {
        let chunks: Vec<Result<&[u8], std::io::Error>> = vec![
            Ok(b"<a href=\"/x\">x</a>".as_slice()),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let result = extract_links_from_stream(stream::iter(chunks), &base("http://a.test/"), 1024).await;
        assert!(matches!(result, Err(ExtractError::Body(_))));
    }
}
