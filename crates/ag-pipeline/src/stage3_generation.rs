//! Stage 3: Generation — lexical compression toward the profile target.
//!
//! Two passes, both bounded by a removal budget derived from the initial
//! estimate. The budget accounts for tokens already removed upstream, so
//! the total reduction never exceeds the profile target.

use std::sync::LazyLock;

use ag_classifier::{protected_ranges, relocate, LevelProfile};
use regex::Regex;

use crate::pipeline::{overlaps_any, PipelineState, StageError};
use crate::stage1_prefill::{estimate_tokens, normalize};

/// Verbose constructions and their compact equivalents, longest first.
const VERBOSE_PHRASES: &[(&str, &str)] = &[
    ("is currently in the process of", "is"),
    ("due to the fact that", "because"),
    ("at this point in time", "now"),
    ("as soon as possible", "immediately"),
    ("in the near future", "soon"),
    ("a large number of", "many"),
    ("in the event that", "if"),
    ("with regard to", "about"),
    ("on a daily basis", "daily"),
    ("in order to", "to"),
];

/// Low-content words eligible for removal once phrase collapsing has
/// exhausted its gains.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being",
    "that", "which", "this", "very", "really", "quite", "rather", "just",
    "currently", "basically", "actually", "simply", "to", "of", "for",
    "so", "all", "with",
];

static VERBOSE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    VERBOSE_PHRASES
        .iter()
        .map(|(phrase, replacement)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).unwrap();
            (re, *replacement)
        })
        .collect()
});

pub fn run(state: &mut PipelineState, profile: &LevelProfile) -> Result<(), StageError> {
    let goal = (profile.target_reduction * state.initial_estimate as f64).floor() as usize;
    let removed_upstream = state.initial_estimate.saturating_sub(state.current_estimate);
    let mut budget = goal.saturating_sub(removed_upstream);

    if budget > 0 {
        collapse_verbose_phrases(state, &mut budget);
    }
    if budget > 0 {
        drop_low_content_words(state, &mut budget);
    }

    if state.text.is_empty() {
        return Err(StageError::EmptyOutput);
    }
    state.spans = relocate(&state.spans, &state.text).map_err(StageError::SpanLost)?;
    state.current_estimate = estimate_tokens(&state.text);
    Ok(())
}

fn collapse_verbose_phrases(state: &mut PipelineState, budget: &mut usize) {
    for (re, replacement) in VERBOSE.iter() {
        loop {
            if *budget == 0 {
                return;
            }
            let ranges = protected_ranges(&state.text, &state.spans);
            let found = re
                .find_iter(&state.text)
                .find(|m| !overlaps_any(m.range(), &ranges))
                .map(|m| (m.start(), m.end(), estimate_tokens(m.as_str())));
            let Some((start, end, matched_tokens)) = found else {
                break;
            };
            let saved = matched_tokens.saturating_sub(estimate_tokens(replacement));
            if saved == 0 || saved > *budget {
                break;
            }
            let mut next = String::with_capacity(state.text.len());
            next.push_str(&state.text[..start]);
            next.push_str(replacement);
            next.push_str(&state.text[end..]);
            let next = normalize(&next);
            if next.is_empty() {
                break;
            }
            state.text = next;
            *budget -= saved;
        }
    }
}

/// Left-to-right single pass dropping stop words. A word is kept when it
/// contains any protected keyword, or when removing it would empty the
/// message.
fn drop_low_content_words(state: &mut PipelineState, budget: &mut usize) {
    let protected: Vec<String> = state
        .spans
        .iter()
        .map(|s| s.keyword.to_ascii_lowercase())
        .collect();
    let words: Vec<&str> = state.text.split_whitespace().collect();
    let total = words.len();
    let mut kept: Vec<&str> = Vec::with_capacity(total);
    let mut removed = 0usize;
    for word in &words {
        let lower = word.to_ascii_lowercase();
        let removable = *budget > 0
            && STOP_WORDS.contains(&lower.as_str())
            && !protected.iter().any(|kw| lower.contains(kw.as_str()))
            && removed + 1 < total;
        if removable {
            removed += 1;
            *budget -= 1;
        } else {
            kept.push(word);
        }
    }
    if removed > 0 {
        let rebuilt = kept.join(" ");
        state.text = rebuilt;
    }
}
