//! Resolver configuration

use crate::stream::StreamOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Resolver settings, usually read from `settings.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Ladder index used when the caller does not ask for one
    pub default_quality: Option<i64>,

    /// Proxy URLs used for metadata fetches
    pub proxies: Vec<String>,

    /// User agent sent with watch page requests
    pub user_agent: String,

    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_quality: None,
            proxies: Vec::new(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ResolverSettings {
    /// Default settings file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubestream")
            .join("settings.json")
    }

    /// Load settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        let settings: ResolverSettings =
            serde_json::from_str(&json).context("Failed to deserialize settings")?;

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path).await
    }

    /// Build stream options, letting explicit overrides win over file defaults
    pub fn stream_options(&self, quality: Option<i64>, proxies: Vec<String>) -> StreamOptions {
        StreamOptions {
            quality: quality.or(self.default_quality),
            proxies: if proxies.is_empty() {
                self.proxies.clone()
            } else {
                proxies
            },
        }
    }
}
