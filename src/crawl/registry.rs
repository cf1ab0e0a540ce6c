// src/crawl/registry.rs
// =============================================================================
// The registry remembers every URL the crawl has seen and what happened to it.
//
// Keys are normalized URLs (see checker::normalize), so each page or link is
// stored at most once. The registry also keeps a running count of records
// that carry a transport error.
//
// Probes for one page run concurrently, so all access goes through a single
// Mutex guarding both the map and the counter. The lock is never held across
// an .await.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::checker::LinkRecord;

#[derive(Debug, Default)]
struct Inner {
    store: HashMap<String, LinkRecord>,
    errors: usize,
}

#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock can't leave the map half-written
    // (every update is a single insert), so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<LinkRecord> {
        self.lock().store.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().store.contains_key(key)
    }

    // Inserts or replaces the record for `key`
    //
    // The error counter is adjusted by the difference between the old and the
    // new record, so replacing a probed leaf with its page record never
    // counts the same URL twice.
    pub fn set(&self, key: impl Into<String>, record: LinkRecord) {
        let mut inner = self.lock();
        let now_failed = record.error.is_some();
        let was_failed = inner
            .store
            .insert(key.into(), record)
            .is_some_and(|previous| previous.error.is_some());

        match (was_failed, now_failed) {
            (false, true) => inner.errors += 1,
            (true, false) => inner.errors -= 1,
            _ => {}
        }
    }

    // Number of records whose request failed outright
    pub fn errors(&self) -> usize {
        self.lock().errors
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    // Copies every entry out, sorted by key
    pub fn snapshot(&self) -> Vec<(String, LinkRecord)> {
        let mut entries: Vec<_> = self
            .lock()
            .store
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn leaf(url: &str, status_code: u16, error: Option<&str>) -> LinkRecord {
        LinkRecord {
            url: Url::parse(url).unwrap(),
            status_code,
            error: error.map(str::to_string),
            parent: "http://a.test".to_string(),
            traversed: false,
        }
    }

    #[test]
    fn test_get_and_set() {
        let registry = Registry::new();
        assert!(registry.get("http://a.test/x").is_none());
        assert!(!registry.contains("http://a.test/x"));

        registry.set("http://a.test/x", leaf("http://a.test/x", 200, None));
        let record = registry.get("http://a.test/x").unwrap();
        assert_eq!(record.status_code, 200);
        assert!(registry.contains("http://a.test/x"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_error_counter_tracks_replacements() {
        let registry = Registry::new();
        registry.set("k", leaf("http://a.test/k", 0, Some("refused")));
        assert_eq!(registry.errors(), 1);

        // Same key failing again is still one failed record
        registry.set("k", leaf("http://a.test/k", 0, Some("refused again")));
        assert_eq!(registry.errors(), 1);

        // Replaced by a successful page fetch
        registry.set("k", LinkRecord::page(Url::parse("http://a.test/k").unwrap(), String::new()));
        assert_eq!(registry.errors(), 0);

        // Status codes alone are not transport errors
        registry.set("m", leaf("http://a.test/m", 404, None));
        assert_eq!(registry.errors(), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_errors_match_snapshot() {
        let registry = Registry::new();
        registry.set("a", leaf("http://a.test/a", 0, Some("timeout")));
        registry.set("b", leaf("http://a.test/b", 200, None));
        registry.set("c", leaf("http://a.test/c", 0, Some("dns")));
        registry.set("a", leaf("http://a.test/a", 200, None));

        let failed = registry
            .snapshot()
            .iter()
            .filter(|(_, record)| record.error.is_some())
            .count();
        assert_eq!(registry.errors(), failed);
        assert_eq!(failed, 1);
    }

    #[test]
    fn test_snapshot_is_sorted_by_key() {
        let registry = Registry::new();
        registry.set("http://a.test/z", leaf("http://a.test/z", 200, None));
        registry.set("http://a.test/a", leaf("http://a.test/a", 200, None));
        let keys: Vec<_> = registry.snapshot().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["http://a.test/a", "http://a.test/z"]);
    }

    #[test]
    fn test_concurrent_sets_keep_one_record_per_key() {
        let registry = std::sync::Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let key = format!("http://a.test/{}", j);
                        let error = (i % 2 == 0).then_some("boom");
                        registry.set(key.clone(), leaf(&key, if error.is_some() { 0 } else { 200 }, error));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 50);
        let failed = registry
            .snapshot()
            .iter()
            .filter(|(_, record)| record.error.is_some())
            .count();
        assert_eq!(registry.errors(), failed);
    }
}
