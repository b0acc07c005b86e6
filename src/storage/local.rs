//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── {language_code}.json   # Encoded LanguageInfo
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! never leaves a half-written snapshot behind.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::LanguageInfo;
use crate::pipeline::{decode, encode};
use crate::storage::{SnapshotStorage, WriteMetadata};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Snapshot key for a language.
    fn snapshot_key(language_code: &str) -> Result<String> {
        let valid = !language_code.is_empty()
            && language_code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::validation(format!(
                "Invalid language code '{language_code}'"
            )));
        }
        Ok(format!("{language_code}.json"))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn save_snapshot(&self, language_info: &LanguageInfo) -> Result<WriteMetadata> {
        let key = Self::snapshot_key(language_info.language_code())?;
        let text = encode(language_info)?;
        self.write_bytes(&key, text.as_bytes()).await?;

        log::info!(
            "Snapshot for '{}' written to {} ({} worksheets)",
            language_info.language_code(),
            self.path(&key).display(),
            language_info.len()
        );

        Ok(WriteMetadata {
            language_code: language_info.language_code().to_string(),
            worksheet_count: language_info.len(),
            timestamp: Utc::now(),
        })
    }

    async fn load_snapshot(&self, language_code: &str) -> Result<Option<LanguageInfo>> {
        let key = Self::snapshot_key(language_code)?;
        let Some(bytes) = self.read_bytes(&key).await? else {
            log::warn!("No snapshot found for '{language_code}'");
            return Ok(None);
        };

        let text = String::from_utf8(bytes)
            .map_err(|e| AppError::snapshot(language_code, format!("not valid UTF-8: {e}")))?;
        let decoded = decode(&text)?;
        if decoded.language_info.language_code() != language_code {
            return Err(AppError::snapshot(
                language_code,
                format!(
                    "{key} contains language '{}'",
                    decoded.language_info.language_code()
                ),
            ));
        }
        Ok(Some(decoded.language_info))
    }

    async fn list_languages(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut languages = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    languages.push(stem.to_string());
                }
            }
        }
        languages.sort();
        Ok(languages)
    }
}
