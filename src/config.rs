// src/config.rs
//! Application configuration: optional YAML file plus environment overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "talentscope.yaml";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound on pages per scrape, whatever the config says.
pub const MAX_PAGES_CAP: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub skills_path: Option<PathBuf>,
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub default_pages: u32,
    pub max_pages: u32,
    /// Finished scrape jobs kept in memory; older ones are evicted.
    pub retained_jobs: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub service_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("talentscope.db"),
            skills_path: None,
            server: ServerConfig::default(),
            scraper: ScraperConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
            default_pages: 5,
            max_pages: 20,
            retained_jobs: 50,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            timeout_seconds: 120,
        }
    }
}

impl ScraperConfig {
    /// Requested page count, defaulted and bounded to `1..=max_pages`.
    pub fn clamp_pages(&self, requested: Option<u32>) -> u32 {
        let max = self.max_pages.clamp(1, MAX_PAGES_CAP);
        requested.unwrap_or(self.default_pages).clamp(1, max)
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `talentscope.yaml` in the
    /// working directory is used when present, otherwise defaults apply.
    /// Environment variables override file values in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.database_path = resolve_path(&config.database_path)?;
        config.skills_path = config
            .skills_path
            .as_deref()
            .map(resolve_path)
            .transpose()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Invalid configuration")
    }

    /// Apply `TALENTSCOPE_*` / `REVIEW_MODEL_URL` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup("TALENTSCOPE_DB") {
            self.database_path = PathBuf::from(db);
        }
        if let Some(skills) = lookup("TALENTSCOPE_SKILLS") {
            self.skills_path = Some(PathBuf::from(skills));
        }
        if let Some(port) = lookup("TALENTSCOPE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("TALENTSCOPE_PORT must be a valid port number"))?;
        }
        if let Some(url) = lookup("REVIEW_MODEL_URL") {
            self.model.service_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        Ok(())
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
