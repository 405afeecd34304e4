//! Domain models and value objects

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A blog post normalized from a provider-specific response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Provider-specific ID, stable across fetches
    pub id: String,
    /// URL-safe identifier, unique within a provider
    pub slug: String,
    /// Post title
    pub title: String,
    /// Short-form teaser text; empty when the provider has none
    #[serde(default)]
    pub excerpt: String,
    /// Full rendered content; empty when the provider has none.
    /// Untrusted markup: sanitization is the renderer's concern.
    #[serde(default)]
    pub html: String,
    /// Publication timestamp; `None` for drafts
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    /// Cover/feature image URL, if any
    #[serde(default)]
    pub cover_image_url: Option<String>,
    /// Estimated reading time in minutes, if the provider reports one
    #[serde(default)]
    pub reading_time_minutes: Option<u32>,
}

impl Post {
    /// Whether the record carries the fields every renderable post must have.
    /// Rows failing this are dropped from listings rather than propagated.
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }
}

/// One page of a post listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    /// Normalized posts, sorted by `published_at` descending
    pub items: Vec<Post>,
    /// Opaque cursor for the next page; `None` when exhausted
    pub next_cursor: Option<String>,
}

impl PostPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Options for a listing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Maximum items to return; must be >= 1, clamped to provider maximums
    pub limit: usize,
    /// Opaque cursor from a previous page, round-tripped verbatim
    #[serde(default)]
    pub cursor: Option<String>,
    /// Provider-specific relations to include (e.g. "authors", "tags")
    #[serde(default)]
    pub include: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
            include: vec![],
        }
    }
}

/// Page size used when the caller does not specify one
pub const DEFAULT_PAGE_SIZE: usize = 10;

impl ListOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Effective limit: at least 1, at most `max`
    pub fn clamped_limit(&self, max: usize) -> usize {
        self.limit.clamp(1, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_requires_id_and_title() {
        let post = Post {
            id: "1".to_string(),
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: String::new(),
            html: String::new(),
            published_at: None,
            cover_image_url: None,
            reading_time_minutes: None,
        };
        assert!(post.is_well_formed());

        let missing_title = Post {
            title: "   ".to_string(),
            ..post.clone()
        };
        assert!(!missing_title.is_well_formed());

        let missing_id = Post {
            id: String::new(),
            ..post
        };
        assert!(!missing_id.is_well_formed());
    }

    #[test]
    fn test_clamped_limit() {
        assert_eq!(ListOptions::with_limit(0).clamped_limit(100), 1);
        assert_eq!(ListOptions::with_limit(5).clamped_limit(100), 5);
        assert_eq!(ListOptions::with_limit(500).clamped_limit(100), 100);
    }
}
