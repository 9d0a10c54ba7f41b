use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::claim::{ClaimStatus, PmsSyncStatus};
use crate::domain::entities::table::{TableDefaults, DEFAULT_PAGE_SIZE};
use crate::domain::table::sort::{PriorityError, SortPriorities};
use crate::infra::source::generated::{DEFAULT_ROW_COUNT, DEFAULT_SEED};
use crate::ui::debounce::DEFAULT_FILTER_DEBOUNCE_MS;

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 25, 50];

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "claims.sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page size options must not be empty")]
    NoPageSizes,
    #[error("page size must be positive")]
    ZeroPageSize,
    #[error("default page size {0} is not one of the page size options")]
    DefaultPageSizeNotOffered(usize),
    #[error(transparent)]
    Priority(#[from] PriorityError),
}

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub status_priority: Vec<ClaimStatus>,
    pub pms_sync_priority: Vec<PmsSyncStatus>,
    pub generated_rows: usize,
    pub seed: u64,
    /// Quiet period after the last keystroke before a text filter commits.
    pub filter_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let priorities = SortPriorities::default();
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            status_priority: priorities.status().to_vec(),
            pms_sync_priority: priorities.pms_sync().to_vec(),
            generated_rows: DEFAULT_ROW_COUNT,
            seed: DEFAULT_SEED,
            filter_debounce_ms: DEFAULT_FILTER_DEBOUNCE_MS,
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config: {}", path.display()))
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&default_config_path()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size_options.is_empty() {
            return Err(ConfigError::NoPageSizes);
        }
        if self.default_page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConfigError::DefaultPageSizeNotOffered(self.default_page_size));
        }
        self.sort_priorities()?;
        Ok(())
    }

    pub fn table_defaults(&self) -> TableDefaults {
        TableDefaults {
            page_size: self.default_page_size,
        }
    }

    pub fn sort_priorities(&self) -> Result<SortPriorities, PriorityError> {
        SortPriorities::new(self.status_priority.clone(), self.pms_sync_priority.clone())
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "claims", "claims-table")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join(DB_FILE))
}

/// WebView profile directory, created on demand.
pub fn default_webview_data_dir() -> Result<PathBuf> {
    let dir = project_dirs()?.data_local_dir().join("webview");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create webview dir: {}", dir.display()))?;
    Ok(dir)
}
