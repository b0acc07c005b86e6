//! Storage abstractions for snapshot persistence.
//!
//! One document per language, read back on the next run as the "old" side of
//! the diff.
//!
//! ## Directory Structure
//!
//! ```text
//! snapshots/
//! ├── de.json
//! ├── ru.json
//! └── zh.json
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::LanguageInfo;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Language of the written snapshot
    pub language_code: String,
    /// Number of worksheets written
    pub worksheet_count: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Persist the snapshot of one language, replacing the previous one.
    async fn save_snapshot(&self, language_info: &LanguageInfo) -> Result<WriteMetadata>;

    /// Load the stored snapshot of a language, `None` if there is none yet.
    async fn load_snapshot(&self, language_code: &str) -> Result<Option<LanguageInfo>>;

    /// Language codes with a stored snapshot, sorted.
    async fn list_languages(&self) -> Result<Vec<String>>;
}
