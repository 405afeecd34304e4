//! Caching decorator with in-flight request de-duplication
//!
//! Wraps any `ContentSource` and memoizes successful results keyed by a
//! request signature (provider, method, serialized options). A concurrent
//! request for the same signature while a fetch is in flight awaits the
//! shared pending future instead of issuing a duplicate call, and receives
//! the same result or the same error as the first caller. Pending slots
//! are cleared when the future settles, so a failed fetch never poisons
//! the slot; only successes are stored.

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use postfeed_domain::{ContentSource, ListOptions, Post, PostPage, ProviderError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Freshness window used when the caller does not configure one
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Clone)]
enum CachedValue {
    Page(PostPage),
    Single(Option<Post>),
}

struct StoredEntry {
    value: CachedValue,
    stored_at: Instant,
}

type FetchFuture = Shared<BoxFuture<'static, Result<CachedValue, ProviderError>>>;

/// Content source decorator memoizing the inner source per request signature
pub struct CachedContentSource {
    inner: Arc<dyn ContentSource>,
    ttl: Duration,
    entries: Mutex<HashMap<String, StoredEntry>>,
    pending: Mutex<HashMap<String, FetchFuture>>,
}

impl CachedContentSource {
    pub fn new(inner: Arc<dyn ContentSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl(inner: Arc<dyn ContentSource>) -> Self {
        Self::new(inner, DEFAULT_TTL)
    }

    /// Drop all stored entries; the next call per signature refetches.
    /// In-flight requests are unaffected and settle normally.
    pub fn invalidate(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn fresh_value(&self, key: &str) -> Result<Option<CachedValue>, ProviderError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ProviderError::Api(e.to_string()))?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone()))
    }

    async fn fetch_shared(
        &self,
        key: String,
        fetch: FetchFuture,
    ) -> Result<CachedValue, ProviderError> {
        if let Some(value) = self.fresh_value(&key)? {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        let fut = {
            let mut pending = self
                .pending
                .lock()
                .map_err(|e| ProviderError::Api(e.to_string()))?;
            match pending.get(&key) {
                Some(existing) => {
                    tracing::debug!(key = %key, "Joining in-flight request");
                    existing.clone()
                }
                None => {
                    pending.insert(key.clone(), fetch.clone());
                    fetch
                }
            }
        };

        let result = fut.clone().await;

        // Every waiter runs the settle path; removal is guarded so a
        // waiter never evicts a newer fetch for the same signature
        {
            let mut pending = self
                .pending
                .lock()
                .map_err(|e| ProviderError::Api(e.to_string()))?;
            if let Some(existing) = pending.get(&key) {
                if existing.ptr_eq(&fut) {
                    pending.remove(&key);
                }
            }
        }

        if let Ok(value) = &result {
            let mut entries = self
                .entries
                .lock()
                .map_err(|e| ProviderError::Api(e.to_string()))?;
            entries.insert(
                key,
                StoredEntry {
                    value: value.clone(),
                    stored_at: Instant::now(),
                },
            );
        }

        result
    }
}

/// Request signature: provider identity, method name, serialized options
fn signature<P: Serialize>(provider: &str, method: &str, params: &P) -> String {
    let mut hasher = Sha256::new();
    hasher.update(provider.as_bytes());
    hasher.update([0u8]);
    hasher.update(method.as_bytes());
    hasher.update([0u8]);
    if let Ok(bytes) = serde_json::to_vec(params) {
        hasher.update(&bytes);
    }
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ContentSource for CachedContentSource {
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError> {
        let key = signature(self.inner.provider(), "list_posts", options);

        let inner = Arc::clone(&self.inner);
        let owned = options.clone();
        let fetch: FetchFuture = async move {
            inner.list_posts(&owned).await.map(CachedValue::Page)
        }
        .boxed()
        .shared();

        match self.fetch_shared(key, fetch).await? {
            CachedValue::Page(page) => Ok(page),
            // The method name is part of the signature
            CachedValue::Single(_) => unreachable!("list signature resolved to a single post"),
        }
    }

    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        let key = signature(self.inner.provider(), "get_post", &slug_or_id);

        let inner = Arc::clone(&self.inner);
        let owned = slug_or_id.to_string();
        let fetch: FetchFuture = async move {
            inner.get_post(&owned).await.map(CachedValue::Single)
        }
        .boxed()
        .shared();

        match self.fetch_shared(key, fetch).await? {
            CachedValue::Single(post) => Ok(post),
            CachedValue::Page(_) => unreachable!("get signature resolved to a page"),
        }
    }

    fn provider(&self) -> &'static str {
        self.inner.provider()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubContentSource;

    fn cached(stub: StubContentSource, ttl: Duration) -> (Arc<StubContentSource>, CachedContentSource) {
        let stub = Arc::new(stub);
        let cache = CachedContentSource::new(stub.clone(), ttl);
        (stub, cache)
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_share_one_fetch() {
        let (stub, cache) = cached(
            StubContentSource::sample().with_delay(Duration::from_millis(25)),
            DEFAULT_TTL,
        );

        let options = ListOptions::with_limit(5);
        let (a, b) = tokio::join!(cache.list_posts(&options), cache.list_posts(&options));

        assert_eq!(stub.fetch_count(), 1);
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn test_fresh_entry_serves_without_network_call() {
        let (stub, cache) = cached(StubContentSource::sample(), DEFAULT_TTL);

        let options = ListOptions::with_limit(5);
        cache.list_posts(&options).await.unwrap();
        cache.list_posts(&options).await.unwrap();

        assert_eq!(stub.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let (stub, cache) = cached(StubContentSource::sample(), Duration::ZERO);

        let options = ListOptions::with_limit(5);
        cache.list_posts(&options).await.unwrap();
        cache.list_posts(&options).await.unwrap();

        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_different_options_do_not_share_entries() {
        let (stub, cache) = cached(StubContentSource::sample(), DEFAULT_TTL);

        cache.list_posts(&ListOptions::with_limit(1)).await.unwrap();
        cache.list_posts(&ListOptions::with_limit(2)).await.unwrap();

        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_shared_failure_reaches_all_waiters_then_clears() {
        let (stub, cache) = cached(
            StubContentSource::sample()
                .with_delay(Duration::from_millis(25))
                .failing_first(1),
            DEFAULT_TTL,
        );

        let options = ListOptions::with_limit(5);
        let (a, b) = tokio::join!(cache.list_posts(&options), cache.list_posts(&options));

        // One upstream call failed; both waiters saw the same error
        assert_eq!(stub.fetch_count(), 1);
        assert!(matches!(a, Err(ProviderError::Network(_))));
        assert!(matches!(b, Err(ProviderError::Network(_))));

        // The pending slot is gone and nothing was stored: retry fetches fresh
        let retry = cache.list_posts(&options).await;
        assert!(retry.is_ok());
        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (stub, cache) = cached(StubContentSource::sample(), DEFAULT_TTL);

        let options = ListOptions::with_limit(5);
        cache.list_posts(&options).await.unwrap();
        cache.invalidate();
        cache.list_posts(&options).await.unwrap();

        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_get_post_cached_per_slug() {
        let (stub, cache) = cached(StubContentSource::sample(), DEFAULT_TTL);

        cache.get_post("campaign-postmortem").await.unwrap();
        cache.get_post("campaign-postmortem").await.unwrap();
        assert_eq!(stub.fetch_count(), 1);

        cache.get_post("content-pipeline").await.unwrap();
        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_not_found_results_are_cached_too() {
        let (stub, cache) = cached(StubContentSource::sample(), DEFAULT_TTL);

        assert!(cache.get_post("missing").await.unwrap().is_none());
        assert!(cache.get_post("missing").await.unwrap().is_none());
        assert_eq!(stub.fetch_count(), 1);
    }

    #[test]
    fn test_signature_varies_by_provider_method_and_options() {
        let a = signature("ghost", "list_posts", &ListOptions::with_limit(5));
        let b = signature("ghost", "list_posts", &ListOptions::with_limit(6));
        let c = signature("ghost", "get_post", &ListOptions::with_limit(5));
        let d = signature("notion", "list_posts", &ListOptions::with_limit(5));

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a, signature("ghost", "list_posts", &ListOptions::with_limit(5)));
    }
}
