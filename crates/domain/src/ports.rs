//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ListOptions, Post, PostPage};

/// Error type for configuration problems, raised at source construction
/// before any network call is attempted
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(String),
    #[error("Invalid configuration value {name}: {message}")]
    Invalid { name: String, message: String },
}

/// Error type for content source operations.
///
/// `Clone` so a shared in-flight request can deliver the same error to
/// every caller awaiting it.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed payload: {0}")]
    Malformed(String),
    #[error("Unrecognized response shape: {0}")]
    UnrecognizedShape(String),
}

/// Port for fetching normalized blog content from a CMS backend.
///
/// The only interface the rest of the application may depend on; nothing
/// outside the adapter layer parses provider-specific response shapes.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page of posts, normalized, draft-free, sorted by
    /// `published_at` descending, at most `options.limit` items long
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError>;

    /// Fetch a single post by slug or ID. Returns `Ok(None)` when the
    /// provider reports not-found; errors for any other failure.
    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError>;

    /// Stable provider identifier (e.g. "ghost", "hashnode"), used in
    /// cache signatures and logs
    fn provider(&self) -> &'static str;
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for std::sync::Arc<T> {
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError> {
        (**self).list_posts(options).await
    }

    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        (**self).get_post(slug_or_id).await
    }

    fn provider(&self) -> &'static str {
        (**self).provider()
    }
}
