//! Constituent source loading and the process-wide table cache.
//!
//! The cache is keyed by the source URL and holds a single entry. The first
//! caller loads the page while holding the lock, so concurrent callers wait
//! for that load instead of issuing their own; the entry is never invalidated.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use super::constituents::ConstituentTable;
use super::provider::DataError;
use super::scrape;

/// The public page listing the index constituents.
pub const DEFAULT_SOURCE_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Anything that can return the HTML of a page.
pub trait ConstituentSource: Send + Sync {
    fn fetch_html(&self, url: &str) -> Result<String, DataError>;
}

/// Blocking HTTP implementation.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ConstituentSource for HttpSource {
    fn fetch_html(&self, url: &str) -> Result<String, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text()
            .map_err(|e| DataError::ResponseFormatChanged(format!("unreadable body: {e}")))
    }
}

/// Fetch and parse the constituent table, bypassing any cache.
pub fn load_table(
    source: &dyn ConstituentSource,
    url: &str,
) -> Result<ConstituentTable, DataError> {
    let html = source.fetch_html(url)?;
    debug!(bytes = html.len(), "fetched constituent page");
    let table = scrape::parse_first_table(&html)?;
    info!(
        url,
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded constituent table"
    );
    Ok(table)
}

/// Single-entry, load-once cache of the constituent table.
pub struct ConstituentCache {
    url: String,
    slot: Mutex<Option<Arc<ConstituentTable>>>,
}

impl ConstituentCache {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            slot: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Return the cached table, loading it through `source` on first use.
    ///
    /// A failed load leaves the cache empty.
    pub fn get_or_load(
        &self,
        source: &dyn ConstituentSource,
    ) -> Result<Arc<ConstituentTable>, DataError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| DataError::Other("constituent cache lock poisoned".into()))?;
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_table(source, &self.url)?);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Like [`get_or_load`](Self::get_or_load) but checks the key first.
    pub fn get_or_load_url(
        &self,
        url: &str,
        source: &dyn ConstituentSource,
    ) -> Result<Arc<ConstituentTable>, DataError> {
        if url != self.url {
            return Err(DataError::CacheKeyMismatch {
                cached: self.url.clone(),
                requested: url.to_string(),
            });
        }
        self.get_or_load(source)
    }

    /// Cached table, if it has been loaded.
    pub fn peek(&self) -> Option<Arc<ConstituentTable>> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = "<table><tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>\
                        <tr><td>MMM</td><td>3M</td><td>Industrials</td></tr></table>";

    struct CountingSource {
        calls: AtomicUsize,
        body: Result<&'static str, ()>,
    }

    impl CountingSource {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body: Ok(PAGE),
            }
        }
    }

    impl ConstituentSource for CountingSource {
        fn fetch_html(&self, _url: &str) -> Result<String, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
            self.body
                .map(String::from)
                .map_err(|_| DataError::NetworkUnreachable("offline".into()))
        }
    }

    #[test]
    fn second_access_is_served_from_cache() {
        let source = CountingSource::ok();
        let cache = ConstituentCache::new(DEFAULT_SOURCE_URL);
        let a = cache.get_or_load(&source).unwrap();
        let b = cache.get_or_load(&source).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_callers_share_one_load() {
        let source = Arc::new(CountingSource::ok());
        let cache = Arc::new(ConstituentCache::new(DEFAULT_SOURCE_URL));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_load(source.as_ref()).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let failing = CountingSource {
            calls: AtomicUsize::new(0),
            body: Err(()),
        };
        let cache = ConstituentCache::new(DEFAULT_SOURCE_URL);
        assert!(cache.get_or_load(&failing).is_err());
        assert!(cache.peek().is_none());

        let good = CountingSource::ok();
        assert_eq!(cache.get_or_load(&good).unwrap().row_count(), 1);
    }

    #[test]
    fn other_urls_are_refused() {
        let source = CountingSource::ok();
        let cache = ConstituentCache::new(DEFAULT_SOURCE_URL);
        let err = cache
            .get_or_load_url("https://example.com/other", &source)
            .unwrap_err();
        assert!(matches!(err, DataError::CacheKeyMismatch { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
