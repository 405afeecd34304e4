//! Hashnode GraphQL adapter
//!
//! POSTs a fixed query document with host/pagination variables. Hashnode
//! API versions disagree on the connection shape: some return a direct
//! `nodes` array, others wrap posts as `edges[].node`. The normalizer
//! detects which shape is present and unwraps it; a payload matching
//! neither is an `UnrecognizedShape` error, never a guess.

use async_trait::async_trait;
use postfeed_domain::listing::finalize_listing;
use postfeed_domain::{ConfigError, ContentSource, ListOptions, Post, PostPage, ProviderError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::normalize::{non_blank, parse_timestamp, text_or_empty};

const DEFAULT_ENDPOINT: &str = "https://gql.hashnode.com";

/// Hashnode caps `posts(first:)` at 50
const MAX_PAGE_SIZE: usize = 50;

const LIST_QUERY: &str = r#"
query PublicationPosts($host: String!, $first: Int!, $after: String) {
  publication(host: $host) {
    posts(first: $first, after: $after) {
      edges {
        node {
          id
          slug
          title
          brief
          publishedAt
          readTimeInMinutes
          coverImage { url }
        }
      }
      pageInfo { endCursor hasNextPage }
    }
  }
}
"#;

const POST_QUERY: &str = r#"
query PublicationPost($host: String!, $slug: String!) {
  publication(host: $host) {
    post(slug: $slug) {
      id
      slug
      title
      brief
      publishedAt
      readTimeInMinutes
      coverImage { url }
      content { html }
    }
  }
}
"#;

/// Content source backed by a Hashnode publication
pub struct HashnodeContentSource {
    client: Client,
    endpoint: String,
    host: String,
    token: Option<SecretString>,
}

impl HashnodeContentSource {
    pub fn new(host: String, token: Option<SecretString>) -> Result<Self, ConfigError> {
        Self::with_endpoint(host, token, DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(
        host: String,
        token: Option<SecretString>,
        endpoint: String,
    ) -> Result<Self, ConfigError> {
        let host = host.trim().to_string();
        if host.is_empty() {
            return Err(ConfigError::Missing("hashnode.host".to_string()));
        }
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(ConfigError::Missing("hashnode.endpoint".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            endpoint,
            host,
            token,
        })
    }

    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ProviderError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(token) = &self.token {
            request = request.header("Authorization", token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Hashnode API returned {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect();
                return Err(ProviderError::Api(format!(
                    "GraphQL errors: {}",
                    messages.join("; ")
                )));
            }
        }

        Ok(body)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashnodePost {
    #[serde(default)]
    id: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    brief: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    read_time_in_minutes: Option<u32>,
    #[serde(default)]
    cover_image: Option<HashnodeCoverImage>,
    #[serde(default)]
    content: Option<HashnodeContent>,
}

#[derive(Deserialize)]
struct HashnodeCoverImage {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct HashnodeContent {
    #[serde(default)]
    html: Option<String>,
}

impl HashnodePost {
    fn normalize(self) -> Post {
        Post {
            id: self.id,
            slug: self.slug,
            title: self.title,
            excerpt: text_or_empty(self.brief),
            html: text_or_empty(self.content.and_then(|c| c.html)),
            published_at: self.published_at.as_deref().and_then(parse_timestamp),
            cover_image_url: non_blank(self.cover_image.and_then(|c| c.url)),
            reading_time_minutes: self.read_time_in_minutes,
        }
    }
}

/// Unwrap a GraphQL posts connection into its raw node values.
///
/// Dispatches on the shape actually present: a `nodes` array, or an
/// `edges` array of `{ node }` wrappers.
fn connection_nodes(connection: &Value) -> Result<Vec<Value>, ProviderError> {
    if let Some(nodes) = connection.get("nodes").and_then(Value::as_array) {
        return Ok(nodes.clone());
    }

    if let Some(edges) = connection.get("edges").and_then(Value::as_array) {
        return edges
            .iter()
            .map(|edge| {
                edge.get("node").cloned().ok_or_else(|| {
                    ProviderError::UnrecognizedShape("edge without node".to_string())
                })
            })
            .collect();
    }

    Err(ProviderError::UnrecognizedShape(
        "posts connection has neither nodes nor edges".to_string(),
    ))
}

/// Normalize a posts connection into domain posts, skipping rows that do
/// not deserialize
fn normalize_connection(connection: &Value) -> Result<Vec<Post>, ProviderError> {
    let nodes = connection_nodes(connection)?;
    Ok(nodes
        .into_iter()
        .filter_map(|node| match serde_json::from_value::<HashnodePost>(node) {
            Ok(post) => Some(post.normalize()),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping undeserializable post node");
                None
            }
        })
        .collect())
}

#[async_trait]
impl ContentSource for HashnodeContentSource {
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError> {
        let limit = options.clamped_limit(MAX_PAGE_SIZE);

        tracing::info!(host = %self.host, limit = limit, "Fetching posts from Hashnode");

        let variables = json!({
            "host": self.host,
            "first": limit,
            "after": options.cursor,
        });

        let body = self.execute(LIST_QUERY, variables).await?;

        let connection = body
            .pointer("/data/publication/posts")
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                ProviderError::Api(format!("No publication found for host {}", self.host))
            })?;

        let next_cursor = match connection.get("pageInfo") {
            Some(info) if info.get("hasNextPage").and_then(Value::as_bool) == Some(true) => info
                .get("endCursor")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };

        let items = finalize_listing(normalize_connection(connection)?, limit);

        tracing::info!(count = items.len(), "Fetched posts");

        Ok(PostPage { items, next_cursor })
    }

    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        let variables = json!({ "host": self.host, "slug": slug_or_id });
        let body = self.execute(POST_QUERY, variables).await?;

        let node = match body.pointer("/data/publication/post") {
            Some(node) if !node.is_null() => node.clone(),
            _ => return Ok(None),
        };

        let post: HashnodePost = serde_json::from_value(node)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(Some(post.normalize()))
    }

    fn provider(&self) -> &'static str {
        "hashnode"
    }
}
