//! Generated file artifact of a worksheet.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// One downloadable rendering of a worksheet (pdf, odt, ...).
///
/// Immutable: a newer file of the same type replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    file_type: String,
    url: String,
    timestamp: DateTime<FixedOffset>,
}

impl FileInfo {
    pub fn new(
        file_type: impl Into<String>,
        url: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            file_type: file_type.into(),
            url: url.into(),
            timestamp,
        }
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp in its canonical persisted form.
    pub fn timestamp_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.file_type, self.url, self.timestamp_string())
    }
}

/// A file timestamp as handed in by a collaborator: already parsed, or raw text.
#[derive(Debug, Clone)]
pub enum TimestampInput {
    Parsed(DateTime<FixedOffset>),
    Raw(String),
}

impl TimestampInput {
    /// Resolve to a timestamp, parsing raw text if needed.
    pub fn resolve(self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        match self {
            TimestampInput::Parsed(ts) => Ok(ts),
            TimestampInput::Raw(raw) => parse_timestamp(&raw),
        }
    }
}

impl From<DateTime<FixedOffset>> for TimestampInput {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        TimestampInput::Parsed(ts)
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(ts: DateTime<Utc>) -> Self {
        TimestampInput::Parsed(ts.fixed_offset())
    }
}

impl From<&str> for TimestampInput {
    fn from(raw: &str) -> Self {
        TimestampInput::Raw(raw.to_string())
    }
}

impl From<String> for TimestampInput {
    fn from(raw: String) -> Self {
        TimestampInput::Raw(raw)
    }
}

/// Parse `2018-12-20T12:58:57+00:00` as well as `2018-12-20T12:58:57Z`.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw.trim())
}

/// Canonical form: RFC 3339 with a numeric offset, never `Z`.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
