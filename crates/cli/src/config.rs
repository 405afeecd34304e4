//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub ghost: GhostConfig,

    #[serde(default)]
    pub hashnode: HashnodeConfig,

    #[serde(default)]
    pub notion: NotionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Relations to include in listing requests, passed through to the provider
    #[serde(default)]
    pub include: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Active provider; adapters are mutually exclusive strategies
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostConfig {
    #[serde(default)]
    pub api_url: String,

    #[serde(default = "default_ghost_content_key_env")]
    pub content_key_env: String,

    #[serde(default = "default_ghost_api_version")]
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashnodeConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_hashnode_endpoint")]
    pub endpoint: String,

    /// Optional; public publications need no token
    #[serde(default = "default_hashnode_token_env")]
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(default)]
    pub database_id: String,

    #[serde(default = "default_notion_token_env")]
    pub token_env: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_provider() -> String {
    "ghost".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_ghost_content_key_env() -> String {
    "GHOST_CONTENT_KEY".to_string()
}

fn default_ghost_api_version() -> String {
    "v5.0".to_string()
}

fn default_hashnode_endpoint() -> String {
    "https://gql.hashnode.com".to_string()
}

fn default_hashnode_token_env() -> String {
    "HASHNODE_TOKEN".to_string()
}

fn default_notion_token_env() -> String {
    "NOTION_TOKEN".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            page_size: default_page_size(),
            include: vec![],
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            cache_enabled: default_true(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            content_key_env: default_ghost_content_key_env(),
            api_version: default_ghost_api_version(),
        }
    }
}

impl Default for HashnodeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            endpoint: default_hashnode_endpoint(),
            token_env: default_hashnode_token_env(),
        }
    }
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            database_id: String::new(),
            token_env: default_notion_token_env(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("POSTFEED")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# postfeed configuration

[general]
log_level = "info"
page_size = 10
# include = ["authors", "tags"]

[source]
provider = "ghost"  # ghost, hashnode, notion, stub
cache_enabled = true
cache_ttl_secs = 60

[ghost]
api_url = "https://demo.ghost.io"
content_key_env = "GHOST_CONTENT_KEY"
api_version = "v5.0"

[hashnode]
host = "blog.example.dev"
endpoint = "https://gql.hashnode.com"
# Optional; public publications need no token
token_env = "HASHNODE_TOKEN"

[notion]
database_id = ""
token_env = "NOTION_TOKEN"
"#
        .to_string()
    }
}
