//! Per-language snapshot: all worksheets of one language.

use indexmap::IndexMap;

use crate::error::{AppError, Result};
use crate::models::diagnostics::Diagnostics;
use crate::models::progress::CompletionThreshold;
use crate::models::snapshot::{SnapshotDocument, WorksheetRecord};
use crate::models::worksheet::WorksheetInfo;
use crate::pipeline::diff::{ChangeLog, DiffCalculator};

/// Aggregate root for one language. Owns its worksheets exclusively.
///
/// Every worksheet stored under a key has that key as its `english_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    language_code: String,
    worksheets: IndexMap<String, WorksheetInfo>,
}

impl LanguageInfo {
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            worksheets: IndexMap::new(),
        }
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Insert or replace the worksheet stored under `english_name`.
    ///
    /// The stored worksheet takes the key as its name and this snapshot's
    /// language as its language.
    pub fn add_worksheet_info(&mut self, english_name: &str, mut worksheet_info: WorksheetInfo) {
        worksheet_info.rebind(english_name, &self.language_code);
        self.worksheets
            .insert(english_name.to_string(), worksheet_info);
    }

    pub fn has_worksheet(&self, english_name: &str) -> bool {
        self.worksheets.contains_key(english_name)
    }

    pub fn get_worksheet(&self, english_name: &str) -> Option<&WorksheetInfo> {
        self.worksheets.get(english_name)
    }

    /// Mutable access for title, progress and file updates. Name and
    /// language are fixed by the slot.
    pub fn get_worksheet_mut(&mut self, english_name: &str) -> Option<&mut WorksheetInfo> {
        self.worksheets.get_mut(english_name)
    }

    /// False if the worksheet itself is unknown.
    pub fn worksheet_has_type(&self, english_name: &str, file_type: &str) -> bool {
        self.worksheets
            .get(english_name)
            .is_some_and(|ws| ws.has_file_type(file_type))
    }

    /// Worksheets in insertion order.
    pub fn worksheets(&self) -> impl Iterator<Item = &WorksheetInfo> {
        self.worksheets.values()
    }

    pub fn len(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Replace all worksheets with the content of `document`.
    ///
    /// The replacement is built completely before it is swapped in: on error
    /// the previous worksheets are untouched, on success none of them survive.
    /// Files with unparseable timestamps are skipped and reported.
    pub fn deserialize(&mut self, document: &SnapshotDocument) -> Result<Diagnostics> {
        if document.language_code != self.language_code {
            return Err(AppError::snapshot(
                &self.language_code,
                format!(
                    "document describes language '{}'",
                    document.language_code
                ),
            ));
        }

        let mut worksheets = IndexMap::with_capacity(document.worksheets.len());
        let mut diagnostics = Diagnostics::new();
        for record in &document.worksheets {
            if record.english_name.trim().is_empty() {
                return Err(AppError::snapshot(
                    &self.language_code,
                    "worksheet without english_name",
                ));
            }
            if worksheets.contains_key(&record.english_name) {
                return Err(AppError::snapshot(
                    &self.language_code,
                    format!("duplicate worksheet '{}'", record.english_name),
                ));
            }
            let (worksheet, skipped) = record.to_worksheet(&self.language_code);
            diagnostics.extend(skipped);
            worksheets.insert(record.english_name.clone(), worksheet);
        }

        log::debug!(
            "Deserialized {} worksheets for '{}' ({} files skipped)",
            worksheets.len(),
            self.language_code,
            diagnostics.len()
        );
        self.worksheets = worksheets;
        Ok(diagnostics)
    }

    /// Structured form of this snapshot.
    pub fn to_document(&self) -> SnapshotDocument {
        SnapshotDocument {
            language_code: self.language_code.clone(),
            worksheets: self.worksheets.values().map(WorksheetRecord::from).collect(),
        }
    }

    /// Worksheets lacking a file of `file_type`, in insertion order.
    pub fn list_worksheets_with_missing(&self, file_type: &str) -> Vec<&WorksheetInfo> {
        self.worksheets
            .values()
            .filter(|ws| !ws.has_file_type(file_type))
            .collect()
    }

    /// Almost finished translations that still need work.
    pub fn list_incomplete_translations(
        &self,
        threshold: &CompletionThreshold,
    ) -> Vec<&WorksheetInfo> {
        self.worksheets
            .values()
            .filter(|ws| ws.is_incomplete_with(threshold))
            .collect()
    }

    /// Worksheets that are 100% translated with nothing fuzzy.
    pub fn count_finished_translations(&self) -> usize {
        self.worksheets.values().filter(|ws| ws.is_finished()).count()
    }

    /// Changes from `old` to `self`.
    pub fn compare(&self, old: &LanguageInfo) -> ChangeLog {
        DiffCalculator::new().calculate(old, self)
    }
}
