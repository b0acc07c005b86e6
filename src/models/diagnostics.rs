//! Recoverable data-quality problems.
//!
//! Lenient operations (adding a file, decoding a snapshot) never fail on bad
//! data. They drop the offending entry, log a warning and hand back a
//! [`Diagnostic`] so callers can report it without scraping logs.

use thiserror::Error;

/// A single dropped update.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A file timestamp could not be parsed; the file entry was not stored.
    #[error("Invalid timestamp '{timestamp}' for {file_type} file of '{worksheet}' ({language}): {reason}")]
    InvalidTimestamp {
        language: String,
        worksheet: String,
        file_type: String,
        timestamp: String,
        reason: String,
    },
}

/// Collected diagnostics of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
