use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::notion::client::API_BASE;
use crate::notion::NotionClient;

const ENV_PREFIX: &str = "LEETNOTION";
const DEFAULT_FILE: &str = "leetnotion";

/// Runtime settings: optional `leetnotion.toml` in the working directory, an
/// explicit `--config` file, then `LEETNOTION_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub notion_token: Option<String>,
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Create missing optional properties on the database before saving.
    #[serde(default)]
    pub auto_provision: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_api_base() -> String {
    API_BASE.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    2000
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::with_name(DEFAULT_FILE).required(false));
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn database(&self) -> Result<&str> {
        self.database_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .context("No database configured (set LEETNOTION_DATABASE_ID or pass --database)")
    }

    pub fn client(&self) -> Result<NotionClient> {
        let token = self
            .notion_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .context("No Notion token configured (set LEETNOTION_NOTION_TOKEN)")?;
        Ok(NotionClient::new(token)
            .with_base_url(self.api_base.as_str())
            .with_retry(self.max_retries, Duration::from_millis(self.backoff_ms)))
    }
}
