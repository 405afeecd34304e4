//! Notion database-as-CMS adapter
//!
//! Queries a Notion database for pages with a `Published` checkbox, sorted
//! by a `Date` property descending, and maps the heterogeneous per-property
//! shapes (rich-text title/excerpt, date object, page-level cover asset)
//! into the common post model. Missing optional properties normalize to
//! empty values, never an error.

use async_trait::async_trait;
use postfeed_domain::listing::finalize_listing;
use postfeed_domain::{ConfigError, ContentSource, ListOptions, Post, PostPage, ProviderError};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::Duration;

use crate::normalize::parse_timestamp;

const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Notion caps query pages at 100 results
const MAX_PAGE_SIZE: usize = 100;

/// Content source backed by a Notion database
pub struct NotionContentSource {
    client: Client,
    base_url: String,
    database_id: String,
    token: SecretString,
    notion_version: String,
}

impl NotionContentSource {
    pub fn new(database_id: String, token: SecretString) -> Result<Self, ConfigError> {
        Self::with_base_url(database_id, token, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(
        database_id: String,
        token: SecretString,
        base_url: String,
    ) -> Result<Self, ConfigError> {
        let database_id = database_id.trim().to_string();
        if database_id.is_empty() {
            return Err(ConfigError::Missing("notion.database_id".to_string()));
        }
        if token.expose_secret().trim().is_empty() {
            return Err(ConfigError::Missing("notion.token".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            database_id,
            token,
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        })
    }

    async fn query_database(&self, body: Value) -> Result<Value, ProviderError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("Notion-Version", &self.notion_version)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Notion API returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    async fn fetch_page(&self, page_id: &str) -> Result<Option<Post>, ProviderError> {
        let url = format!("{}/pages/{}", self.base_url, page_id);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("Notion-Version", &self.notion_version)
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
                "Notion API returned {}: {}",
                status, body
            )));
        }

        let page: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(Some(map_page(&page)))
    }
}

/// Concatenate the plain text of a Notion rich-text array
fn rich_text_plain(value: &Value) -> String {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Extract the title property, whatever it is named
fn extract_title(properties: &Value) -> String {
    let named = ["Name", "Title"]
        .iter()
        .filter_map(|name| properties.get(name))
        .find_map(|prop| prop.get("title"));

    let title = match named {
        Some(t) => Some(t),
        // Databases can rename the title column; find it by shape
        None => properties
            .as_object()
            .and_then(|props| props.values().find_map(|prop| prop.get("title"))),
    };

    title.map(rich_text_plain).unwrap_or_default()
}

fn extract_rich_text(properties: &Value, name: &str) -> String {
    properties
        .get(name)
        .and_then(|prop| prop.get("rich_text"))
        .map(rich_text_plain)
        .unwrap_or_default()
}

fn extract_date(properties: &Value, name: &str) -> Option<String> {
    properties
        .get(name)
        .and_then(|prop| prop.get("date"))
        .and_then(|date| date.get("start"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Page-level cover asset: external URL or Notion-hosted file
fn extract_cover(page: &Value) -> Option<String> {
    let cover = page.get("cover")?;
    let url = match cover.get("type").and_then(Value::as_str) {
        Some("external") => cover.pointer("/external/url"),
        Some("file") => cover.pointer("/file/url"),
        _ => None,
    };
    url.and_then(Value::as_str).map(str::to_string)
}

/// Map one database page into the common post shape
fn map_page(page: &Value) -> Post {
    let id = page
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let empty = json!({});
    let properties = page.get("properties").unwrap_or(&empty);

    let slug = {
        let explicit = extract_rich_text(properties, "Slug");
        if explicit.is_empty() { id.clone() } else { explicit }
    };

    Post {
        id,
        slug,
        title: extract_title(properties),
        excerpt: extract_rich_text(properties, "Excerpt"),
        // Page bodies live behind the block-children endpoint; the
        // listing fields are the contract here
        html: String::new(),
        published_at: extract_date(properties, "Date")
            .as_deref()
            .and_then(parse_timestamp),
        cover_image_url: extract_cover(page),
        reading_time_minutes: None,
    }
}

/// Notion page ids are 32 hex characters, optionally dashed
fn looks_like_page_id(value: &str) -> bool {
    let hex: String = value.chars().filter(|c| *c != '-').collect();
    hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait]
impl ContentSource for NotionContentSource {
    async fn list_posts(&self, options: &ListOptions) -> Result<PostPage, ProviderError> {
        let limit = options.clamped_limit(MAX_PAGE_SIZE);

        let mut body = json!({
            "filter": {
                "property": "Published",
                "checkbox": { "equals": true }
            },
            "sorts": [
                { "property": "Date", "direction": "descending" }
            ],
            "page_size": limit,
        });
        if let Some(cursor) = &options.cursor {
            body["start_cursor"] = json!(cursor);
        }

        tracing::info!(database_id = %self.database_id, limit = limit, "Querying Notion database");

        let response = self.query_database(body).await?;

        let results = response
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ProviderError::UnrecognizedShape(
                    "query response has no results array".to_string(),
                )
            })?;

        let next_cursor = if response.get("has_more").and_then(Value::as_bool) == Some(true) {
            response
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            None
        };

        let posts: Vec<Post> = results.iter().map(map_page).collect();
        let items = finalize_listing(posts, limit);

        tracing::info!(count = items.len(), "Fetched posts");

        Ok(PostPage { items, next_cursor })
    }

    async fn get_post(&self, slug_or_id: &str) -> Result<Option<Post>, ProviderError> {
        let body = json!({
            "filter": {
                "property": "Slug",
                "rich_text": { "equals": slug_or_id }
            },
            "page_size": 1,
        });

        let response = self.query_database(body).await?;

        if let Some(page) = response
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
        {
            return Ok(Some(map_page(page)));
        }

        if looks_like_page_id(slug_or_id) {
            return self.fetch_page(slug_or_id).await;
        }

        Ok(None)
    }

    fn provider(&self) -> &'static str {
        "notion"
    }
}
