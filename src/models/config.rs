//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::progress::CompletionThreshold;
use crate::pipeline::DiffCalculator;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// What counts as incomplete and which formats are expected
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Diff policy
    #[serde(default)]
    pub diff: DiffConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let percent = self.tracking.min_translated_percent;
        if percent == 0 || percent > 100 {
            return Err(AppError::validation(
                "tracking.min_translated_percent must be within 1..=100",
            ));
        }
        if self.tracking.file_types.is_empty() {
            return Err(AppError::validation("No file types defined"));
        }
        if self
            .tracking
            .file_types
            .iter()
            .any(|t| t.trim().is_empty())
        {
            return Err(AppError::validation("tracking.file_types contains an empty entry"));
        }
        if self.storage.snapshot_dir.as_os_str().is_empty() {
            return Err(AppError::validation("storage.snapshot_dir is empty"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(AppError::config(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }

    pub fn completion_threshold(&self) -> CompletionThreshold {
        CompletionThreshold::new(self.tracking.min_translated_percent)
    }

    pub fn diff_calculator(&self) -> DiffCalculator {
        DiffCalculator::with_updates(self.diff.detect_updates)
    }
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Completion threshold and expected formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Minimum translated share for a translation to be reported as incomplete
    #[serde(default = "defaults::min_translated_percent")]
    pub min_translated_percent: u8,

    /// Formats every worksheet is expected to provide
    #[serde(default = "defaults::file_types")]
    pub file_types: Vec<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_translated_percent: defaults::min_translated_percent(),
            file_types: defaults::file_types(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Report newer files and changed titles/progress, not only additions and removals
    #[serde(default = "defaults::detect_updates")]
    pub detect_updates: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            detect_updates: defaults::detect_updates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `{language_code}.json` per language
    #[serde(default = "defaults::snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: defaults::snapshot_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn min_translated_percent() -> u8 {
        50
    }
    pub fn file_types() -> Vec<String> {
        vec!["pdf".into(), "odt".into(), "doc".into()]
    }
    pub fn detect_updates() -> bool {
        true
    }
    pub fn snapshot_dir() -> PathBuf {
        PathBuf::from("snapshots")
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
