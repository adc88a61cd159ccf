//! Protected keyword matching.
//!
//! All matching is exact substring search, case-insensitive over ASCII.
//! Offsets are byte offsets into the text a span was located in and are
//! recomputed with [`relocate`] whenever the text changes.

use ag_core::config::KeywordConfig;
use ag_core::types::{ProtectedSpan, SpanReason};
use std::ops::Range;

/// Configured keyword table, flattened from the grouped config lists.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    entries: Vec<(String, SpanReason)>,
}

impl KeywordSet {
    /// Build the scan table. With `safety_only` set, the agricultural and
    /// ISO vocabularies are skipped (agricultural-safety-mode off).
    pub fn from_config(keywords: &KeywordConfig, safety_only: bool) -> Self {
        let mut entries: Vec<(String, SpanReason)> = Vec::new();
        for kw in &keywords.safety {
            entries.push((kw.clone(), SpanReason::Safety));
        }
        if !safety_only {
            for kw in &keywords.agricultural {
                entries.push((kw.clone(), SpanReason::Agricultural));
            }
            for kw in &keywords.iso {
                entries.push((kw.clone(), SpanReason::Iso));
            }
        }
        Self { entries }
    }

    pub fn default_set() -> Self {
        Self::from_config(&KeywordConfig::default(), false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One span per first occurrence of each matched keyword. The span
    /// records the matched text with its original casing, so later
    /// integrity checks are exact.
    pub fn scan(&self, text: &str) -> Vec<ProtectedSpan> {
        let mut spans = Vec::new();
        for (kw, reason) in &self.entries {
            if let Some(offset) = find_first(text, kw) {
                spans.push(ProtectedSpan {
                    keyword: text[offset..offset + kw.len()].to_string(),
                    offset,
                    reason: *reason,
                });
            }
        }
        spans
    }
}

/// First case-insensitive occurrence of `keyword` in `text`, as a byte
/// offset. ASCII lowercasing is byte-length preserving, so offsets into the
/// lowered copy are valid in the original.
pub fn find_first(text: &str, keyword: &str) -> Option<usize> {
    text.to_ascii_lowercase()
        .find(&keyword.to_ascii_lowercase())
}

/// Re-locate spans against edited text by fresh substring search. Returns
/// the keyword that went missing on failure.
pub fn relocate(spans: &[ProtectedSpan], text: &str) -> Result<Vec<ProtectedSpan>, String> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match find_first(text, &span.keyword) {
            Some(offset) => out.push(ProtectedSpan {
                keyword: span.keyword.clone(),
                offset,
                reason: span.reason,
            }),
            None => return Err(span.keyword.clone()),
        }
    }
    Ok(out)
}

/// Byte ranges of the first occurrence of each span keyword in `text`.
/// Spans that cannot be located are skipped; the stage-boundary relocate
/// is what reports them as lost.
pub fn protected_ranges(text: &str, spans: &[ProtectedSpan]) -> Vec<Range<usize>> {
    spans
        .iter()
        .filter_map(|span| {
            find_first(text, &span.keyword).map(|start| start..start + span.keyword.len())
        })
        .collect()
}
