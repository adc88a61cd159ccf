//! Stage 2: Prompt processing — filler-phrase stripping.
//!
//! Only runs when the active level profile enables format optimization.
//! Matches that touch a protected span are skipped, never forced.

use std::sync::LazyLock;

use ag_classifier::{protected_ranges, relocate, LevelProfile};
use regex::Regex;

use crate::pipeline::{overlaps_any, PipelineState, StageError};
use crate::stage1_prefill::{estimate_tokens, normalize};

/// Courtesy and filler phrases with no operational content. Longest first
/// so subphrases never pre-empt a containing phrase.
const FILLER_PHRASES: &[&str] = &[
    "we would like to inform you that",
    "at your earliest convenience",
    "it should be noted that",
    "for your information",
    "as you may know",
    "note that",
    "thank you",
    "kindly",
    "please",
];

static FILLERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    FILLER_PHRASES
        .iter()
        .map(|phrase| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).unwrap()
        })
        .collect()
});

pub fn run(state: &mut PipelineState, profile: &LevelProfile) -> Result<(), StageError> {
    if !profile.format_optimization {
        return Ok(());
    }
    for re in FILLERS.iter() {
        // Ranges are recomputed per phrase: each strip shifts offsets.
        let ranges = protected_ranges(&state.text, &state.spans);
        let stripped = strip_unprotected(&state.text, re, &ranges);
        let cleaned = normalize(&stripped);
        if !cleaned.is_empty() {
            state.text = cleaned;
        }
    }
    state.spans = relocate(&state.spans, &state.text).map_err(StageError::SpanLost)?;
    state.current_estimate = estimate_tokens(&state.text);
    Ok(())
}

/// Remove every match of `re` that does not overlap a protected byte range.
fn strip_unprotected(text: &str, re: &Regex, ranges: &[std::ops::Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in re.find_iter(text) {
        if overlaps_any(m.range(), ranges) {
            continue;
        }
        out.push_str(&text[cursor..m.start()]);
        cursor = m.end();
    }
    out.push_str(&text[cursor..]);
    out
}
