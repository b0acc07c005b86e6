//! Diff calculation between two snapshots of one language.
//!
//! Computes what happened between the previous run ("old") and the current
//! run ("new") so the reporter can announce new, updated and removed
//! worksheets and files.
//!
//! A new worksheet is reported once; its files are not listed separately.
//! Removals are tracked symmetrically to additions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{LanguageInfo, WorksheetInfo};

/// Kind of a single change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    NewWorksheet,
    UpdatedWorksheet,
    DeletedWorksheet,
    NewPdf,
    UpdatedPdf,
    DeletedPdf,
    NewOdt,
    UpdatedOdt,
    DeletedOdt,
    NewDoc,
    UpdatedDoc,
    DeletedDoc,
    /// Any other file format; the format is carried by [`Change::file_type`]
    NewFile,
    UpdatedFile,
    DeletedFile,
}

impl ChangeType {
    pub fn new_file(file_type: &str) -> Self {
        match file_type {
            "pdf" => Self::NewPdf,
            "odt" => Self::NewOdt,
            "doc" => Self::NewDoc,
            _ => Self::NewFile,
        }
    }

    pub fn updated_file(file_type: &str) -> Self {
        match file_type {
            "pdf" => Self::UpdatedPdf,
            "odt" => Self::UpdatedOdt,
            "doc" => Self::UpdatedDoc,
            _ => Self::UpdatedFile,
        }
    }

    pub fn deleted_file(file_type: &str) -> Self {
        match file_type {
            "pdf" => Self::DeletedPdf,
            "odt" => Self::DeletedOdt,
            "doc" => Self::DeletedDoc,
            _ => Self::DeletedFile,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewWorksheet => "NEW_WORKSHEET",
            Self::UpdatedWorksheet => "UPDATED_WORKSHEET",
            Self::DeletedWorksheet => "DELETED_WORKSHEET",
            Self::NewPdf => "NEW_PDF",
            Self::UpdatedPdf => "UPDATED_PDF",
            Self::DeletedPdf => "DELETED_PDF",
            Self::NewOdt => "NEW_ODT",
            Self::UpdatedOdt => "UPDATED_ODT",
            Self::DeletedOdt => "DELETED_ODT",
            Self::NewDoc => "NEW_DOC",
            Self::UpdatedDoc => "UPDATED_DOC",
            Self::DeletedDoc => "DELETED_DOC",
            Self::NewFile => "NEW_FILE",
            Self::UpdatedFile => "UPDATED_FILE",
            Self::DeletedFile => "DELETED_FILE",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub change_type: ChangeType,
    pub english_name: String,
    /// Set for file changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl Change {
    fn worksheet(change_type: ChangeType, english_name: &str) -> Self {
        Self {
            change_type,
            english_name: english_name.to_string(),
            file_type: None,
        }
    }

    fn file(change_type: ChangeType, english_name: &str, file_type: &str) -> Self {
        Self {
            change_type,
            english_name: english_name.to_string(),
            file_type: Some(file_type.to_string()),
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_type {
            Some(file_type) => write!(f, "{}: {} ({})", self.change_type, self.english_name, file_type),
            None => write!(f, "{}: {}", self.change_type, self.english_name),
        }
    }
}

/// All changes between two snapshots, in deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    changes: Vec<Change>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    pub fn get_all_changes(&self) -> &[Change] {
        &self.changes
    }

    /// Changes of one kind.
    pub fn changes_of(&self, change_type: ChangeType) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(move |c| c.change_type == change_type)
    }

    /// Changes concerning one worksheet.
    pub fn for_worksheet<'a>(&'a self, english_name: &'a str) -> impl Iterator<Item = &'a Change> {
        self.changes
            .iter()
            .filter(move |c| c.english_name == english_name)
    }
}

impl IntoIterator for ChangeLog {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Calculator for computing diffs between snapshots.
#[derive(Debug, Clone)]
pub struct DiffCalculator {
    /// Whether to detect updates (newer files, changed title or progress)
    detect_updates: bool,
}

impl Default for DiffCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffCalculator {
    /// Create a new diff calculator.
    pub fn new() -> Self {
        Self {
            detect_updates: true,
        }
    }

    /// Create a diff calculator that only detects additions/removals.
    pub fn additions_only() -> Self {
        Self {
            detect_updates: false,
        }
    }

    pub fn with_updates(detect_updates: bool) -> Self {
        Self { detect_updates }
    }

    /// Calculate the changes leading from `old` to `new`.
    pub fn calculate(&self, old: &LanguageInfo, new: &LanguageInfo) -> ChangeLog {
        if old.language_code() != new.language_code() {
            log::warn!(
                "Comparing snapshots of different languages: '{}' vs '{}'",
                old.language_code(),
                new.language_code()
            );
        }

        let mut changes = ChangeLog::new();

        for current in new.worksheets() {
            let name = current.english_name();
            match old.get_worksheet(name) {
                None => changes.add_change(Change::worksheet(ChangeType::NewWorksheet, name)),
                Some(previous) => self.compare_worksheet(previous, current, &mut changes),
            }
        }

        // Removed: in old but not in new
        for previous in old.worksheets() {
            if !new.has_worksheet(previous.english_name()) {
                changes.add_change(Change::worksheet(
                    ChangeType::DeletedWorksheet,
                    previous.english_name(),
                ));
            }
        }

        if !changes.is_empty() {
            log::info!(
                "Diff for '{}': {} changes",
                new.language_code(),
                changes.len()
            );
        }
        changes
    }

    fn compare_worksheet(
        &self,
        previous: &WorksheetInfo,
        current: &WorksheetInfo,
        changes: &mut ChangeLog,
    ) {
        let name = current.english_name();

        if self.detect_updates
            && (previous.title != current.title || previous.progress != current.progress)
        {
            changes.add_change(Change::worksheet(ChangeType::UpdatedWorksheet, name));
        }

        for (file_type, file) in current.get_file_infos() {
            match previous.get_file_type_info(file_type) {
                None => changes.add_change(Change::file(
                    ChangeType::new_file(file_type),
                    name,
                    file_type,
                )),
                Some(old_file) => {
                    if self.detect_updates
                        && (old_file.timestamp() < file.timestamp() || old_file.url() != file.url())
                    {
                        changes.add_change(Change::file(
                            ChangeType::updated_file(file_type),
                            name,
                            file_type,
                        ));
                    }
                }
            }
        }

        for file_type in previous.get_file_infos().keys() {
            if !current.has_file_type(file_type) {
                changes.add_change(Change::file(
                    ChangeType::deleted_file(file_type),
                    name,
                    file_type,
                ));
            }
        }
    }
}

/// Convenience function to calculate a diff with update detection.
pub fn calculate_diff(old: &LanguageInfo, new: &LanguageInfo) -> ChangeLog {
    DiffCalculator::new().calculate(old, new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranslationProgress;

    const TIME: &str = "2018-12-20T12:58:57+00:00";
    const LATER: &str = "2019-02-01T10:00:00Z";

    fn make_worksheet(name: &str, files: &[(&str, &str)]) -> WorksheetInfo {
        let progress = TranslationProgress::new(44, 44, 0, 0).unwrap();
        let mut ws = WorksheetInfo::new(name, "de", format!("{name} (de)"), progress);
        for (file_type, timestamp) in files {
            ws.add_file_info(file_type, &format!("https://example.com/{name}.{file_type}"), *timestamp)
                .unwrap();
        }
        ws
    }

    fn make_language(worksheets: Vec<WorksheetInfo>) -> LanguageInfo {
        let mut info = LanguageInfo::new("de");
        for ws in worksheets {
            let name = ws.english_name().to_string();
            info.add_worksheet_info(&name, ws);
        }
        info
    }

    fn types(log: &ChangeLog) -> Vec<ChangeType> {
        log.iter().map(|c| c.change_type).collect()
    }

    #[test]
    fn test_no_changes() {
        let info = make_language(vec![
            make_worksheet("Prayer", &[("pdf", TIME), ("odt", TIME)]),
            make_worksheet("Forgiving", &[]),
        ]);
        assert!(calculate_diff(&info, &info).is_empty());

        let copy = make_language(vec![
            make_worksheet("Prayer", &[("pdf", TIME), ("odt", TIME)]),
            make_worksheet("Forgiving", &[]),
        ]);
        assert!(calculate_diff(&info, &copy).is_empty());
        assert_eq!(calculate_diff(&copy, &info).len(), 0);
    }

    #[test]
    fn test_new_worksheet_subsumes_files() {
        let old = make_language(vec![make_worksheet("Prayer", &[("pdf", TIME)])]);
        let new = make_language(vec![
            make_worksheet("Prayer", &[("pdf", TIME)]),
            make_worksheet("Forgiving", &[("pdf", TIME), ("odt", TIME)]),
        ]);

        let log = calculate_diff(&old, &new);
        assert_eq!(types(&log), vec![ChangeType::NewWorksheet]);
        assert_eq!(log.get_all_changes()[0].english_name, "Forgiving");
        assert!(log.get_all_changes()[0].file_type.is_none());
    }

    #[test]
    fn test_new_file() {
        let old = make_language(vec![make_worksheet("Prayer", &[("pdf", TIME)])]);
        let new = make_language(vec![make_worksheet("Prayer", &[("pdf", TIME), ("odt", TIME)])]);

        let log = calculate_diff(&old, &new);
        assert_eq!(types(&log), vec![ChangeType::NewOdt]);
        assert_eq!(log.get_all_changes()[0].file_type.as_deref(), Some("odt"));
    }

    #[test]
    fn test_unknown_format_uses_generic_kind() {
        let old = make_language(vec![make_worksheet("Prayer", &[])]);
        let new = make_language(vec![make_worksheet("Prayer", &[("odg", TIME)])]);

        let log = calculate_diff(&old, &new);
        assert_eq!(types(&log), vec![ChangeType::NewFile]);
        assert_eq!(log.get_all_changes()[0].file_type.as_deref(), Some("odg"));
    }

    #[test]
    fn test_removals() {
        let old = make_language(vec![
            make_worksheet("Prayer", &[("pdf", TIME), ("doc", TIME)]),
            make_worksheet("Forgiving", &[]),
        ]);
        let new = make_language(vec![make_worksheet("Prayer", &[("pdf", TIME)])]);

        let log = calculate_diff(&old, &new);
        assert_eq!(
            types(&log),
            vec![ChangeType::DeletedDoc, ChangeType::DeletedWorksheet]
        );
        assert_eq!(log.changes_of(ChangeType::DeletedWorksheet).count(), 1);
    }

    #[test]
    fn test_updates() {
        let old = make_language(vec![make_worksheet("Prayer", &[("pdf", TIME)])]);
        let mut new = make_language(vec![make_worksheet("Prayer", &[("pdf", LATER)])]);

        assert_eq!(types(&calculate_diff(&old, &new)), vec![ChangeType::UpdatedPdf]);
        assert!(DiffCalculator::additions_only().calculate(&old, &new).is_empty());

        // An older file showing up again is not an update
        assert!(calculate_diff(&new, &old).is_empty());

        new.get_worksheet_mut("Prayer").unwrap().title = "Gebet".to_string();
        let log = calculate_diff(&old, &new);
        assert_eq!(
            types(&log),
            vec![ChangeType::UpdatedWorksheet, ChangeType::UpdatedPdf]
        );
        assert_eq!(log.for_worksheet("Prayer").count(), 2);
    }

    #[test]
    fn test_mixed_changes() {
        let old = make_language(vec![
            make_worksheet("Keep", &[("pdf", TIME)]),
            make_worksheet("Remove Me", &[]),
        ]);
        let new = make_language(vec![
            make_worksheet("Keep", &[("pdf", TIME), ("odt", TIME)]),
            make_worksheet("New One", &[("pdf", TIME)]),
        ]);

        let log = calculate_diff(&old, &new);
        let rendered: Vec<String> = log.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "NEW_ODT: Keep (odt)",
                "NEW_WORKSHEET: New One",
                "DELETED_WORKSHEET: Remove Me",
            ]
        );
    }

    #[test]
    fn test_empty_to_full_and_back() {
        let empty = LanguageInfo::new("de");
        let full = make_language(vec![make_worksheet("Prayer", &[("pdf", TIME)])]);

        assert_eq!(types(&calculate_diff(&empty, &full)), vec![ChangeType::NewWorksheet]);
        assert_eq!(
            types(&calculate_diff(&full, &empty)),
            vec![ChangeType::DeletedWorksheet]
        );
    }

    #[test]
    fn test_change_type_serialization() {
        let json = serde_json::to_string(&ChangeType::NewOdt).unwrap();
        assert_eq!(json, "\"NEW_ODT\"");
        assert_eq!(ChangeType::new_file("pdf"), ChangeType::NewPdf);
        assert_eq!(ChangeType::deleted_file("odt"), ChangeType::DeletedOdt);
        assert_eq!(ChangeType::updated_file("xls"), ChangeType::UpdatedFile);
    }
}
