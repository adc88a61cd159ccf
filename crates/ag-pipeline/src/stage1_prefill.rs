//! Stage 1: Pre-fill — whitespace normalization and initial token estimate.

use crate::pipeline::{PipelineState, StageError};
use ag_classifier::relocate;

/// The token heuristic used across the whole pipeline: whitespace-delimited
/// token count. Deterministic by construction.
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn run(state: &mut PipelineState) -> Result<(), StageError> {
    state.text = normalize(&state.text);
    if state.text.is_empty() {
        return Err(StageError::EmptyOutput);
    }
    // Normalization shifts positions; spans are found again by substring
    // search, never by carrying offsets forward.
    state.spans = relocate(&state.spans, &state.text).map_err(StageError::SpanLost)?;
    state.initial_estimate = estimate_tokens(&state.text);
    state.current_estimate = state.initial_estimate;
    Ok(())
}
