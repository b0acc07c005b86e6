//! Translation state of one worksheet in one language.

use indexmap::IndexMap;

use crate::models::diagnostics::Diagnostic;
use crate::models::file_info::{FileInfo, TimestampInput};
use crate::models::progress::{CompletionThreshold, TranslationProgress};

/// A worksheet as seen in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetInfo {
    /// Stable name of the worksheet across languages
    english_name: String,

    /// Language this instance describes
    language_code: String,

    /// Translated title
    pub title: String,

    /// Translation progress counts
    pub progress: TranslationProgress,

    /// file_type -> file, in first-seen order
    files: IndexMap<String, FileInfo>,
}

impl WorksheetInfo {
    pub fn new(
        english_name: impl Into<String>,
        language_code: impl Into<String>,
        title: impl Into<String>,
        progress: TranslationProgress,
    ) -> Self {
        Self {
            english_name: english_name.into(),
            language_code: language_code.into(),
            title: title.into(),
            progress,
            files: IndexMap::new(),
        }
    }

    pub fn english_name(&self) -> &str {
        &self.english_name
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Attach to the aggregate slot `english_name` of language `language_code`.
    pub(crate) fn rebind(&mut self, english_name: &str, language_code: &str) {
        if self.english_name != english_name || self.language_code != language_code {
            log::debug!(
                "Rebinding worksheet '{}' ({}) to '{}' ({})",
                self.english_name,
                self.language_code,
                english_name,
                language_code
            );
            self.english_name = english_name.to_string();
            self.language_code = language_code.to_string();
        }
    }

    /// Insert or replace the file of `file_type`.
    ///
    /// An unparseable timestamp drops the update: the file map stays as it
    /// was, a warning is logged and the returned [`Diagnostic`] describes it.
    /// Replacing an existing type keeps its position in [`Self::get_file_infos`].
    pub fn add_file_info(
        &mut self,
        file_type: &str,
        url: &str,
        timestamp: impl Into<TimestampInput>,
    ) -> Result<&FileInfo, Diagnostic> {
        let input = timestamp.into();
        let raw = match &input {
            TimestampInput::Raw(raw) => raw.clone(),
            TimestampInput::Parsed(ts) => ts.to_rfc3339(),
        };

        let timestamp = match input.resolve() {
            Ok(ts) => ts,
            Err(e) => {
                let diagnostic = Diagnostic::InvalidTimestamp {
                    language: self.language_code.clone(),
                    worksheet: self.english_name.clone(),
                    file_type: file_type.to_string(),
                    timestamp: raw,
                    reason: e.to_string(),
                };
                log::warn!("{diagnostic}. Ignoring file.");
                return Err(diagnostic);
            }
        };

        let file_info = FileInfo::new(file_type, url, timestamp);
        log::debug!(
            "{} ({}): storing {}",
            self.english_name,
            self.language_code,
            file_info
        );

        let (index, _) = self.files.insert_full(file_type.to_string(), file_info);
        Ok(&self.files[index])
    }

    pub fn has_file_type(&self, file_type: &str) -> bool {
        self.files.contains_key(file_type)
    }

    pub fn get_file_type_info(&self, file_type: &str) -> Option<&FileInfo> {
        self.files.get(file_type)
    }

    pub fn get_file_infos(&self) -> &IndexMap<String, FileInfo> {
        &self.files
    }

    /// Almost done, but not clean yet (default threshold).
    pub fn is_incomplete(&self) -> bool {
        self.is_incomplete_with(&CompletionThreshold::default())
    }

    pub fn is_incomplete_with(&self, threshold: &CompletionThreshold) -> bool {
        threshold.is_incomplete(&self.progress)
    }

    /// Fully translated with no fuzzy segments.
    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file_info::parse_timestamp;
    use std::sync::{Mutex, Once};

    /// Records every log line so tests can assert on level and text.
    struct CapturingLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        records: Mutex::new(Vec::new()),
    };
    static INSTALL: Once = Once::new();

    fn captured_logs(containing: &str) -> Vec<(log::Level, String)> {
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message.contains(containing))
            .cloned()
            .collect()
    }

    const TEST_TIME: &str = "2018-12-20T12:58:57+00:00";
    const TEST_URL: &str =
        "https://www.4training.net/mediawiki/images/7/70/Gottes_Reden_wahrnehmen.pdf";
    const TEST_URL2: &str =
        "https://www.4training.net/mediawiki/images/1/15/Gottes_Reden_wahrnehmen.pdf";

    fn worksheet() -> WorksheetInfo {
        let progress = TranslationProgress::new(44, 44, 0, 0).unwrap();
        WorksheetInfo::new("Hearing from God", "de", "Gottes Reden wahrnehmen", progress)
    }

    #[test]
    fn test_add_file_info() {
        let mut ws = worksheet();
        ws.add_file_info("pdf", TEST_URL, TEST_TIME).unwrap();
        assert!(ws.has_file_type("pdf"));
        assert!(!ws.has_file_type("odt"));

        let file_info = ws.get_file_type_info("pdf").unwrap();
        assert_eq!(file_info.url(), TEST_URL);
        assert_eq!(file_info.timestamp_string(), TEST_TIME);
        assert_eq!(file_info.file_type(), "pdf");
    }

    #[test]
    fn test_add_file_info_accepts_z_suffix() {
        let mut ws = worksheet();
        ws.add_file_info("doc", TEST_URL, "2018-12-20T12:58:57Z")
            .unwrap();
        let file_info = ws.get_file_type_info("doc").unwrap();
        assert_eq!(file_info.timestamp_string(), TEST_TIME);
        assert_eq!(
            file_info.timestamp(),
            parse_timestamp(TEST_TIME).unwrap()
        );
    }

    #[test]
    fn test_add_file_info_overwrites() {
        let mut ws = worksheet();
        ws.add_file_info("pdf", TEST_URL, TEST_TIME).unwrap();
        ws.add_file_info("doc", TEST_URL, TEST_TIME).unwrap();
        let stored = ws
            .add_file_info("pdf", TEST_URL2, "2019-03-01T08:00:00Z")
            .unwrap();
        assert_eq!(stored.url(), TEST_URL2);

        let file_info = ws.get_file_type_info("pdf").unwrap();
        assert_eq!(file_info.url(), TEST_URL2);
        assert_eq!(file_info.timestamp_string(), "2019-03-01T08:00:00+00:00");
        assert_eq!(ws.get_file_infos().len(), 2);
    }

    #[test]
    fn test_add_file_info_invalid_timestamp() {
        let mut ws = worksheet();
        let result = ws.add_file_info("odg", TEST_URL, "2018-12-20-12-58-57");
        assert!(matches!(
            result,
            Err(Diagnostic::InvalidTimestamp { ref file_type, .. }) if file_type == "odg"
        ));
        assert!(!ws.has_file_type("odg"));
        assert!(ws.get_file_infos().is_empty());
    }

    #[test]
    fn test_invalid_timestamp_logs_one_warning() {
        INSTALL.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });

        // Unique name so parallel tests cannot match these records
        let progress = TranslationProgress::new(10, 10, 0, 0).unwrap();
        let mut ws = WorksheetInfo::new("Dealing with Money", "de", "Umgang mit Geld", progress);
        assert!(ws.add_file_info("pdf", TEST_URL, "20.12.2018").is_err());

        let warnings: Vec<String> = captured_logs("Dealing with Money")
            .into_iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .map(|(_, message)| message)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("20.12.2018"));
        assert!(warnings[0].contains("pdf"));
    }

    #[test]
    fn test_decode_warns_once_per_skipped_file() {
        INSTALL.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });

        let text = r#"{
            "language_code": "fr",
            "worksheets": [{
                "english_name": "Forgiving Step by Step",
                "title": "Pardonner",
                "progress": {"total": 10, "translated": 10, "fuzzy": 0, "proofread": 0},
                "files": [
                    {"file_type": "pdf", "url": "https://example.com/p.pdf", "timestamp": "soon"},
                    {"file_type": "odt", "url": "https://example.com/p.odt", "timestamp": "later"}
                ]
            }]
        }"#;
        let decoded = crate::pipeline::decode(text).unwrap();
        assert_eq!(decoded.diagnostics.len(), 2);

        let warnings = captured_logs("Forgiving Step by Step")
            .into_iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .count();
        assert_eq!(warnings, 2);
    }

    #[test]
    fn test_invalid_timestamp_keeps_existing_file() {
        let mut ws = worksheet();
        ws.add_file_info("pdf", TEST_URL, TEST_TIME).unwrap();
        assert!(ws.add_file_info("pdf", TEST_URL2, "yesterday").is_err());
        assert_eq!(ws.get_file_type_info("pdf").unwrap().url(), TEST_URL);
    }

    #[test]
    fn test_get_file_infos_order() {
        let mut ws = worksheet();
        ws.add_file_info("pdf", TEST_URL, TEST_TIME).unwrap();
        ws.add_file_info("doc", TEST_URL, "2018-12-20T12:58:57Z")
            .unwrap();
        ws.add_file_info("pdf", TEST_URL2, TEST_TIME).unwrap();
        let _ = ws.add_file_info("odg", TEST_URL, "2018-12-20-12-58-57");

        let keys: Vec<&str> = ws.get_file_infos().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["pdf", "doc"]);
    }

    #[test]
    fn test_is_incomplete() {
        assert!(!worksheet().is_incomplete());
        assert!(worksheet().is_finished());

        let incomplete = WorksheetInfo::new(
            "Hearing from God",
            "ro",
            "random",
            TranslationProgress::new(44, 40, 2, 0).unwrap(),
        );
        assert!(incomplete.is_incomplete());

        // Barely started translations are ignored, not incomplete
        let unfinished = WorksheetInfo::new(
            "Hearing from God",
            "ru",
            "random",
            TranslationProgress::new(44, 20, 2, 0).unwrap(),
        );
        assert!(!unfinished.is_incomplete());
    }
}
