// src/checker/normalize.rs
// =============================================================================
// This module turns raw URL strings into the key we use to decide whether
// two links point at "the same" page.
//
// The rule is intentionally narrow:
// - Leading and trailing whitespace is removed (hrefs like " example.com/" exist)
// - Anything after '#' is dropped (fragments never change what the server returns)
// - The trailing '/' is removed so `example.com` and `example.com/` match
//
// It does NOT lowercase paths, collapse default ports, or reorder queries.
// =============================================================================

// Returns the deduplication key for a URL string
//
// Note: the whole run of trailing '/' and whitespace is removed, not just one
// slash, so "http://x.com//" also becomes "http://x.com". Stripping a single
// slash would make normalize(normalize(s)) differ from normalize(s).
//
// Examples:
//   "http://x.com/"        -> "http://x.com"
//   "  http://x.com/  "    -> "http://x.com"
//   "http://x.com/#frag"   -> "http://x.com"
//   "http://x.com/a/b"     -> "http://x.com/a/b"
pub fn normalize(raw: &str) -> String {
    let without_fragment = match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };

    without_fragment
        .trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}
