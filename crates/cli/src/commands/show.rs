//! Show command - single post detail view

use anyhow::{Context, Result, bail};
use postfeed_domain::ContentSource;
use std::path::PathBuf;

use crate::args::ShowArgs;
use crate::commands::list::{build_source, format_timestamp};
use crate::config::AppConfig;

pub async fn execute(args: ShowArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_default();
    let source = build_source(&config)?;

    let post = source
        .get_post(&args.slug)
        .await
        .with_context(|| format!("Failed to fetch post {}", args.slug))?;

    let Some(post) = post else {
        bail!("Post not found: {}", args.slug);
    };

    if args.json {
        let json = serde_json::to_string_pretty(&post).context("Failed to serialize post")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", post.title);
    println!("{}", "=".repeat(post.title.len()));
    println!();
    println!("Published: {}", format_timestamp(&post));
    if let Some(minutes) = post.reading_time_minutes {
        println!("Reading time: {} min", minutes);
    }
    if let Some(cover) = &post.cover_image_url {
        println!("Cover: {}", cover);
    }
    if !post.excerpt.is_empty() {
        println!();
        println!("{}", post.excerpt);
    }
    if !post.html.is_empty() {
        println!();
        println!("{}", post.html);
    }

    Ok(())
}
