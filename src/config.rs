// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file and validate it.
///
/// A missing or unreadable file falls back to defaults; an invalid one is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        log::warn!("No config at {path:?}, using default configuration.");
        Config::default()
    };

    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config {path:?}: {e}")))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert!(config.diff.detect_updates);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[tracking]\nmin_translated_percent = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Config(_))));

        std::fs::write(&path, "[tracking\n").unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Toml(_))));
    }
}
