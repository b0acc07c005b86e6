//! Translation progress of one worksheet in one language.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Segment counts reported by the translation system.
///
/// Always satisfies `translated <= total`, `fuzzy <= total` and
/// `proofread <= total`; deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProgress")]
pub struct TranslationProgress {
    total: u32,
    translated: u32,
    fuzzy: u32,
    proofread: u32,
}

#[derive(Deserialize)]
struct RawProgress {
    total: u32,
    translated: u32,
    fuzzy: u32,
    #[serde(default)]
    proofread: u32,
}

impl TryFrom<RawProgress> for TranslationProgress {
    type Error = AppError;

    fn try_from(raw: RawProgress) -> Result<Self> {
        Self::new(raw.total, raw.translated, raw.fuzzy, raw.proofread)
    }
}

impl TranslationProgress {
    /// Create validated progress counts.
    pub fn new(total: u32, translated: u32, fuzzy: u32, proofread: u32) -> Result<Self> {
        for (name, value) in [
            ("translated", translated),
            ("fuzzy", fuzzy),
            ("proofread", proofread),
        ] {
            if value > total {
                return Err(AppError::validation(format!(
                    "{name} count {value} exceeds total {total}"
                )));
            }
        }
        Ok(Self {
            total,
            translated,
            fuzzy,
            proofread,
        })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn translated(&self) -> u32 {
        self.translated
    }

    pub fn fuzzy(&self) -> u32 {
        self.fuzzy
    }

    pub fn proofread(&self) -> u32 {
        self.proofread
    }

    /// Everything translated and nothing left fuzzy.
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.translated == self.total && self.fuzzy == 0
    }

    /// Share of translated segments, 0.0 for an empty worksheet.
    pub fn translated_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.translated as f64 / self.total as f64) * 100.0
    }
}

/// Rule separating "almost done" translations from barely started ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionThreshold {
    /// Minimum translated share (0-100) for a translation to count as
    /// incomplete rather than unfinished. Default: 50%
    pub min_translated_percent: u8,
}

impl Default for CompletionThreshold {
    fn default() -> Self {
        Self {
            min_translated_percent: 50,
        }
    }
}

impl CompletionThreshold {
    pub fn new(min_translated_percent: u8) -> Self {
        Self {
            min_translated_percent,
        }
    }

    /// Below the threshold: not worth reporting yet.
    pub fn is_unfinished(&self, progress: &TranslationProgress) -> bool {
        if progress.total == 0 {
            return true;
        }
        u64::from(progress.translated) * 100
            < u64::from(progress.total) * u64::from(self.min_translated_percent)
    }

    /// At or above the threshold, but something is still untranslated or fuzzy.
    pub fn is_incomplete(&self, progress: &TranslationProgress) -> bool {
        !self.is_unfinished(progress) && !progress.is_finished()
    }
}
