// src/models/mod.rs

//! Domain models for the tracker.
//!
//! A [`LanguageInfo`] is the snapshot of one language: its worksheets with
//! their translation progress and generated files.

mod config;
mod diagnostics;
mod file_info;
mod language;
mod progress;
mod snapshot;
mod worksheet;

// Re-export all public types
pub use config::{Config, DiffConfig, LoggingConfig, StorageConfig, TrackingConfig};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use file_info::{FileInfo, TimestampInput, format_timestamp, parse_timestamp};
pub use language::LanguageInfo;
pub use progress::{CompletionThreshold, TranslationProgress};
pub use snapshot::{FileRecord, SnapshotDocument, WorksheetRecord};
pub use worksheet::WorksheetInfo;
