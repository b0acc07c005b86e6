//! Persisted snapshot document.
//!
//! This is the at-rest shape of a [`LanguageInfo`](crate::models::LanguageInfo):
//! the language code followed by the worksheets in insertion order, each
//! with its files in first-seen order.
//!
//! ```json
//! {
//!   "language_code": "de",
//!   "worksheets": [
//!     {
//!       "english_name": "Hearing from God",
//!       "title": "Gottes Reden wahrnehmen",
//!       "progress": { "total": 44, "translated": 44, "fuzzy": 0, "proofread": 0 },
//!       "files": [
//!         { "file_type": "pdf", "url": "https://...", "timestamp": "2018-12-20T12:58:57+00:00" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::models::diagnostics::Diagnostics;
use crate::models::file_info::FileInfo;
use crate::models::progress::TranslationProgress;
use crate::models::worksheet::WorksheetInfo;

/// Snapshot of one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub language_code: String,

    #[serde(default)]
    pub worksheets: Vec<WorksheetRecord>,
}

/// One worksheet entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetRecord {
    pub english_name: String,
    pub title: String,
    pub progress: TranslationProgress,

    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// One file entry of a worksheet. The timestamp stays text until applied so
/// a single bad entry cannot reject the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_type: String,
    pub url: String,
    pub timestamp: String,
}

impl From<&FileInfo> for FileRecord {
    fn from(file: &FileInfo) -> Self {
        Self {
            file_type: file.file_type().to_string(),
            url: file.url().to_string(),
            timestamp: file.timestamp_string(),
        }
    }
}

impl From<&WorksheetInfo> for WorksheetRecord {
    fn from(worksheet: &WorksheetInfo) -> Self {
        Self {
            english_name: worksheet.english_name().to_string(),
            title: worksheet.title.clone(),
            progress: worksheet.progress,
            files: worksheet
                .get_file_infos()
                .values()
                .map(FileRecord::from)
                .collect(),
        }
    }
}

impl WorksheetRecord {
    /// Build the worksheet, skipping files whose timestamp does not parse.
    pub fn to_worksheet(&self, language_code: &str) -> (WorksheetInfo, Diagnostics) {
        let mut worksheet = WorksheetInfo::new(
            self.english_name.as_str(),
            language_code,
            self.title.as_str(),
            self.progress,
        );
        let mut diagnostics = Diagnostics::new();
        for file in &self.files {
            if let Err(diagnostic) =
                worksheet.add_file_info(&file.file_type, &file.url, file.timestamp.as_str())
            {
                diagnostics.push(diagnostic);
            }
        }
        (worksheet, diagnostics)
    }
}
