//! Ghost Content API adapter
//!
//! A single authenticated GET per operation against the Ghost Content API
//! (`/ghost/api/content/...`, key as query parameter, `Accept-Version`
//! header). Normalization is a direct field rename from the flat `posts`
//! array.

use async_trait::async_trait;
use postfeed_domain::listing::finalize_listing;
use postfeed_domain::{ConfigError, ContentSource, ListOptions, Post, PostPage, ProviderError};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::normalize::{non_blank, parse_timestamp, text_or_empty};

/// Ghost caps Content API pages at 100 posts
const MAX_PAGE_SIZE: usize = 100;

/// Content source backed by a Ghost publication
pub struct GhostContentSource {
    client: Client,
    api_url: String,
    content_key: SecretString,
    api_version: String,
}

impl GhostContentSource {
    pub fn new(
        api_url: String,
        content_key: SecretString,
        api_version: String,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(ConfigError::Missing("ghost.api_url".to_string()));
        }
        if content_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Missing("ghost.content_key".to_string()));
        }
        let api_version = if api_version.trim().is_empty() {
            "v5.0".to_string()
        } else {
            api_version.trim().to_string()
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            api_url,
            content_key,
            api_version,
        })
    }

    async fn fetch_posts(
        &self,
        query: &[(&str, String)],
    ) -> Result<Option<GhostPostsResponse>, ProviderError> {
        let url = format!("{}/ghost/api/content/posts/", self.api_url);

        let mut params: Vec<(&str, String)> =
            vec![("key", self.content_key.expose_secret().to_string())];
        params.extend(query.iter().cloned());

        let response = self
            .client
            .get(&url)
            .header("Accept-Version", &self.api_version)
            .query(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Ghost API returned {}: {}",
                status, body
            )));
        }

        let parsed: GhostPostsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(Some(parsed))
    }

    async fn fetch_one(&self, path: &str) -> Result<Option<Post>, ProviderError> {
        let url = format!("{}/ghost/api/content/posts/{}/", self.api_url, path);
        let response = self
            .client
            .get(&url)
            .header("Accept-Version", &self.api_version)
            .query(&[("key", self.content_key.expose_secret().to_string())])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Ghost API returned {}: {}",
                status, body
            )));
        }

        let parsed: GhostPostsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(parsed.posts.into_iter().next().map(GhostPost::normalize))
    }
}

#[derive(Deserialize)]
struct GhostPostsResponse {
    #[serde(default)]
    posts: Vec<GhostPost>,
    #[serde(default)]
    meta: Option<GhostMeta>,
}

#[derive(Deserialize)]
struct GhostMeta {
    pagination: GhostPagination,
}

#[derive(Deserialize)]
struct GhostPagination {
    #[serde(default)]
    next: Option<u32>,
}

#[derive(Deserialize)]
struct GhostPost {
    #[serde(default)]
    id: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    custom_excerpt: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    feature_image: Option<String>,
    #[serde(default)]
    reading_time: Option<u32>,
}

impl GhostPost {
    fn normalize(self) -> Post {
        Post {
            id: self.id,
            slug: self.slug,
            title: self.title,
            excerpt: text_or_empty(self.custom_excerpt.or(self.excerpt)),
            html: text_or_empty(self.html),
            published_at: self.published_at.as_deref().and_then(parse_timestamp),
            cover_image_url: non_blank(self.feature_image),
            reading_time_minutes: self.reading_time,
        }
    }
}

#[async_trait]
impl ContentSource for GhostContentSource {
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError> {
        let limit = options.clamped_limit(MAX_PAGE_SIZE);

        // Ghost paginates by page number; the cursor round-trips it
        let page: u32 = match options.cursor.as_deref() {
            Some(cursor) => cursor
                .parse()
                .map_err(|_| ProviderError::Api(format!("Invalid listing cursor: {}", cursor)))?,
            None => 1,
        };

        let mut query: Vec<(&str, String)> = vec![
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        if !options.include.is_empty() {
            query.push(("include", options.include.join(",")));
        }

        tracing::info!(limit = limit, page = page, "Fetching posts from Ghost");

        let response = self
            .fetch_posts(&query)
            .await?
            .ok_or_else(|| ProviderError::Api("Ghost posts endpoint not found".to_string()))?;

        let next_cursor = response
            .meta
            .and_then(|m| m.pagination.next)
            .map(|n| n.to_string());

        let posts: Vec<Post> = response.posts.into_iter().map(GhostPost::normalize).collect();
        let items = finalize_listing(posts, limit);

        tracing::info!(count = items.len(), "Fetched posts");

        Ok(PostPage { items, next_cursor })
    }

    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        // Slug is the common lookup; fall back to the ID route
        if let Some(post) = self.fetch_one(&format!("slug/{}", slug_or_id)).await? {
            return Ok(Some(post));
        }
        self.fetch_one(slug_or_id).await
    }

    fn provider(&self) -> &'static str {
        "ghost"
    }
}
