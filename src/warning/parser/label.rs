use crate::error::RecordError;
use crate::warning::types::Strictness;

/// Turns free-text warning categories into lowercase hyphenated slugs
#[derive(Debug, Clone, Default)]
pub struct LabelNormalizer {
    strictness: Strictness,
}

impl LabelNormalizer {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    /// Lowercase the label and join its space-separated words with hyphens
    ///
    /// Splitting is on single spaces, so doubled, leading or trailing spaces produce
    /// empty segments (`"Flood  Warning"` becomes `"flood--warning"`). Strict mode
    /// rejects such labels instead. The result never contains a space, which makes
    /// normalization idempotent.
    pub fn normalize(&self, raw: &str) -> Result<String, RecordError> {
        let lower = raw.to_lowercase();
        let segments: Vec<&str> = lower.split(' ').collect();

        if self.strictness == Strictness::Strict && segments.iter().any(|s| s.is_empty()) {
            return Err(RecordError::LabelNormalize {
                label: raw.to_string(),
                reason: "label is empty or has leading, trailing or repeated spaces".to_string(),
            });
        }

        Ok(segments.join("-"))
    }
}
