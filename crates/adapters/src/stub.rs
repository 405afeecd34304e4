//! Stub content source for tests and offline runs

use async_trait::async_trait;
use postfeed_domain::listing::finalize_listing;
use postfeed_domain::{ContentSource, ListOptions, Post, PostPage, ProviderError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::normalize::parse_timestamp;

/// In-memory content source with deterministic posts.
///
/// Counts upstream fetches so cache tests can assert call counts, and can
/// inject an artificial delay (to widen the in-flight window) or initial
/// failures (to exercise error propagation).
pub struct StubContentSource {
    posts: Vec<Post>,
    delay: Option<Duration>,
    fail_first: AtomicUsize,
    calls: AtomicUsize,
}

impl StubContentSource {
    /// Create an empty stub
    pub fn empty() -> Self {
        Self::with_posts(vec![])
    }

    /// Create a stub with predefined posts
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            delay: None,
            fail_first: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Deterministic sample publication, used by the CLI stub provider
    pub fn sample() -> Self {
        let post = |id: &str, slug: &str, title: &str, excerpt: &str, date: &str| Post {
            id: id.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            html: format!("<p>{}</p>", excerpt),
            published_at: parse_timestamp(date),
            cover_image_url: None,
            reading_time_minutes: Some(3),
        };

        Self::with_posts(vec![
            post(
                "stub-1",
                "launching-the-site",
                "Launching the Site",
                "Why this site exists and what to expect here.",
                "2024-01-10T09:00:00Z",
            ),
            post(
                "stub-2",
                "campaign-postmortem",
                "Campaign Postmortem",
                "Numbers and lessons from the spring campaign.",
                "2024-02-20T09:00:00Z",
            ),
            post(
                "stub-3",
                "content-pipeline",
                "Content Pipeline Notes",
                "How posts travel from draft to published.",
                "2024-03-05T09:00:00Z",
            ),
        ])
    }

    /// Delay every call by the given duration
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the first `n` calls with a network error
    pub fn failing_first(self, n: usize) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Number of fetches that reached this source
    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn simulate_call(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(ProviderError::Network("stub: injected failure".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl ContentSource for StubContentSource {
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError> {
        self.simulate_call().await?;

        let limit = options.clamped_limit(100);
        Ok(PostPage {
            items: finalize_listing(self.posts.clone(), limit),
            next_cursor: None,
        })
    }

    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        self.simulate_call().await?;

        Ok(self
            .posts
            .iter()
            .find(|post| post.slug == slug_or_id || post.id == slug_or_id)
            .cloned())
    }

    fn provider(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_listing_is_sorted_descending() {
        let stub = StubContentSource::sample();
        let page = stub.list_posts(&ListOptions::with_limit(10)).await.unwrap();

        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].slug, "content-pipeline");
        assert_eq!(page.items[2].slug, "launching-the-site");
        assert_eq!(stub.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_get_post_by_slug_or_id() {
        let stub = StubContentSource::sample();

        let by_slug = stub.get_post("campaign-postmortem").await.unwrap();
        assert!(by_slug.is_some());

        let by_id = stub.get_post("stub-2").await.unwrap();
        assert_eq!(by_id.unwrap().slug, "campaign-postmortem");

        let missing = stub.get_post("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_failing_first_recovers() {
        let stub = StubContentSource::sample().failing_first(1);

        let first = stub.list_posts(&ListOptions::default()).await;
        assert!(matches!(first, Err(ProviderError::Network(_))));

        let second = stub.list_posts(&ListOptions::default()).await;
        assert!(second.is_ok());
    }
}
