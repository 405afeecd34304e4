//! Feed view-model use case
//!
//! The contract the UI layer consumes: one call per page, with loading,
//! empty, and error outcomes folded into a single state value so the
//! renderer never has to branch on `Result` directly. Navigation to a
//! detail view goes through `open`.

use crate::model::{ListOptions, Post, PostPage};
use crate::ports::{ContentSource, ProviderError};

/// Renderable state of the blog feed
#[derive(Debug, Clone)]
pub enum FeedState {
    /// At least one post to render
    Ready(PostPage),
    /// Successful fetch, nothing published
    Empty,
    /// Fetch failed; render a visible error and allow manual retry
    Failed(ProviderError),
}

/// Configuration for the feed use case
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Posts per page
    pub page_size: usize,
    /// Relations to include in listing requests
    pub include: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: crate::model::DEFAULT_PAGE_SIZE,
            include: vec![],
        }
    }
}

/// Use case driving the blog feed for a consumer view
pub struct FeedController<S> {
    source: S,
    config: FeedConfig,
}

impl<S: ContentSource> FeedController<S> {
    pub fn new(source: S, config: FeedConfig) -> Self {
        Self { source, config }
    }

    /// Load one page of the feed, folding errors into the state
    pub async fn load(&self, cursor: Option<String>) -> FeedState {
        let options = ListOptions {
            limit: self.config.page_size,
            cursor,
            include: self.config.include.clone(),
        };

        tracing::info!(
            provider = self.source.provider(),
            limit = options.limit,
            "Loading feed page"
        );

        match self.source.list_posts(&options).await {
            Ok(page) if page.is_empty() => FeedState::Empty,
            Ok(page) => FeedState::Ready(page),
            Err(e) => {
                tracing::warn!(provider = self.source.provider(), error = %e, "Feed load failed");
                FeedState::Failed(e)
            }
        }
    }

    /// Resolve a single post for the detail view
    pub async fn open(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        self.source.get_post(slug_or_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use time::OffsetDateTime;

    struct FakeSource {
        page: Result<PostPage, ProviderError>,
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn list_posts(&self, _options: &ListOptions) -> Result<PostPage, ProviderError> {
            self.page.clone()
        }

        async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
            Ok(self
                .page
                .as_ref()
                .ok()
                .and_then(|p| p.items.iter().find(|post| post.slug == slug_or_id))
                .cloned())
        }

        fn provider(&self) -> &'static str {
            "fake"
        }
    }

    fn sample_post() -> Post {
        Post {
            id: "1".to_string(),
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            excerpt: "First post".to_string(),
            html: "<p>Hello</p>".to_string(),
            published_at: Some(OffsetDateTime::now_utc()),
            cover_image_url: None,
            reading_time_minutes: Some(3),
        }
    }

    #[tokio::test]
    async fn test_load_ready() {
        let controller = FeedController::new(
            FakeSource {
                page: Ok(PostPage {
                    items: vec![sample_post()],
                    next_cursor: Some("2".to_string()),
                }),
            },
            FeedConfig::default(),
        );

        match controller.load(None).await {
            FeedState::Ready(page) => {
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.next_cursor.as_deref(), Some("2"));
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_empty() {
        let controller = FeedController::new(
            FakeSource {
                page: Ok(PostPage::default()),
            },
            FeedConfig::default(),
        );

        assert!(matches!(controller.load(None).await, FeedState::Empty));
    }

    #[tokio::test]
    async fn test_load_folds_errors_into_state() {
        let controller = FeedController::new(
            FakeSource {
                page: Err(ProviderError::Network("connection refused".to_string())),
            },
            FeedConfig::default(),
        );

        match controller.load(None).await {
            FeedState::Failed(ProviderError::Network(_)) => {}
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_resolves_by_slug() {
        let controller = FeedController::new(
            FakeSource {
                page: Ok(PostPage {
                    items: vec![sample_post()],
                    next_cursor: None,
                }),
            },
            FeedConfig::default(),
        );

        let found = controller.open("hello-world").await.unwrap();
        assert_eq!(found.unwrap().title, "Hello World");

        let missing = controller.open("no-such-post").await.unwrap();
        assert!(missing.is_none());
    }
}
