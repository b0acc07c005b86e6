//! Snapshot encoding and decoding.
//!
//! Pure functions around [`SnapshotDocument`]: `decode(encode(l))` yields a
//! snapshot equal to `l`, and encoding that result again gives the same text.

use crate::error::Result;
use crate::models::{Diagnostics, LanguageInfo, SnapshotDocument};

/// A decoded snapshot plus the file entries that had to be skipped.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub language_info: LanguageInfo,
    pub diagnostics: Diagnostics,
}

/// Encode a snapshot as pretty-printed JSON.
pub fn encode(language_info: &LanguageInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(&language_info.to_document())?)
}

/// Decode a snapshot from JSON text.
///
/// Fails on text that is not a snapshot document at all. Individual file
/// entries with unparseable timestamps are skipped and reported instead;
/// each one is logged once, where it is dropped.
pub fn decode(text: &str) -> Result<Decoded> {
    let document: SnapshotDocument = serde_json::from_str(text)?;
    from_document(&document)
}

/// Build a snapshot from an already parsed document.
pub fn from_document(document: &SnapshotDocument) -> Result<Decoded> {
    let mut language_info = LanguageInfo::new(document.language_code.as_str());
    let diagnostics = language_info.deserialize(document)?;
    Ok(Decoded {
        language_info,
        diagnostics,
    })
}
