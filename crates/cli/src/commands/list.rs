//! List command - render the blog feed

use anyhow::{Context, Result, bail};
use postfeed_adapters::{
    CachedContentSource, GhostContentSource, HashnodeContentSource, NotionContentSource,
    StubContentSource,
};
use postfeed_domain::usecases::feed::{FeedConfig, FeedController, FeedState};
use postfeed_domain::{ContentSource, Post};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;

use crate::args::ListArgs;
use crate::config::AppConfig;

pub async fn execute(args: ListArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_default();

    let source = build_source(&config)?;
    let controller = FeedController::new(
        source,
        FeedConfig {
            page_size: args.limit.unwrap_or(config.general.page_size),
            include: config.general.include.clone(),
        },
    );

    match controller.load(args.cursor).await {
        FeedState::Ready(page) => {
            if args.json {
                let json =
                    serde_json::to_string_pretty(&page).context("Failed to serialize page")?;
                println!("{}", json);
            } else {
                for post in &page.items {
                    print_listing_row(post);
                }
                if let Some(cursor) = &page.next_cursor {
                    println!();
                    println!("More posts available: --cursor {}", cursor);
                }
            }
            Ok(())
        }
        FeedState::Empty => {
            if args.json {
                println!("{}", serde_json::json!({ "items": [], "next_cursor": null }));
            } else {
                println!("No posts published yet.");
            }
            Ok(())
        }
        FeedState::Failed(e) => Err(e).context("Failed to load feed"),
    }
}

fn print_listing_row(post: &Post) {
    let date = post
        .published_at
        .map(|t| t.date().to_string())
        .unwrap_or_default();

    println!("{}  {}", date, post.title);
    println!("          slug: {}", post.slug);
    if !post.excerpt.is_empty() {
        println!("          {}", post.excerpt);
    }
    println!();
}

/// Construct the configured provider adapter, wrapped in the cache
/// decorator when enabled. Adapters are mutually exclusive; exactly one
/// is active per run.
pub(crate) fn build_source(config: &AppConfig) -> Result<Arc<dyn ContentSource>> {
    tracing::debug!(provider = %config.source.provider, "Building content source");

    let inner: Arc<dyn ContentSource> = match config.source.provider.as_str() {
        "ghost" => Arc::new(GhostContentSource::new(
            config.ghost.api_url.clone(),
            load_secret(&config.ghost.content_key_env, "ghost")?,
            config.ghost.api_version.clone(),
        )?),
        "hashnode" => Arc::new(HashnodeContentSource::with_endpoint(
            config.hashnode.host.clone(),
            load_optional_secret(&config.hashnode.token_env),
            config.hashnode.endpoint.clone(),
        )?),
        "notion" => Arc::new(NotionContentSource::new(
            config.notion.database_id.clone(),
            load_secret(&config.notion.token_env, "notion")?,
        )?),
        "stub" => Arc::new(StubContentSource::sample()),
        other => bail!("Unknown content provider: {}", other),
    };

    if config.source.cache_enabled {
        let ttl = Duration::from_secs(config.source.cache_ttl_secs);
        Ok(Arc::new(CachedContentSource::new(inner, ttl)))
    } else {
        Ok(inner)
    }
}

/// Read a required credential from the env var named in config
pub(crate) fn load_secret(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No credential env var configured for provider {}", provider);
    }

    let value = std::env::var(env_var).with_context(|| {
        format!(
            "Missing credential env var {} for provider {}",
            env_var, provider
        )
    })?;

    if value.trim().is_empty() {
        bail!(
            "Credential env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(value.into()))
}

fn load_optional_secret(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }
    std::env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| SecretString::new(v.into()))
}

pub(crate) fn format_timestamp(post: &Post) -> String {
    post.published_at
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "draft".to_string())
}
