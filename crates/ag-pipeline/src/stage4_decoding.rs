//! Stage 4: Decoding — target-format rendering and span integrity check.

use ag_classifier::relocate;
use ag_core::types::MessageFormat;

use crate::pipeline::{PipelineState, StageError};
use crate::stage1_prefill::estimate_tokens;

pub fn run(state: &mut PipelineState, format: MessageFormat) -> Result<(), StageError> {
    let rendered = match format {
        MessageFormat::Standard => state.text.clone(),
        MessageFormat::Brief => render_brief(&state.text),
        MessageFormat::BulletPoints => render_bullets(&state.text),
    };
    if rendered.is_empty() {
        return Err(StageError::EmptyOutput);
    }
    // Reformatting must not drop any protected keyword.
    for span in &state.spans {
        if !rendered.contains(&span.keyword) {
            return Err(StageError::SpanLost(span.keyword.clone()));
        }
    }
    state.text = rendered;
    state.spans = relocate(&state.spans, &state.text).map_err(StageError::SpanLost)?;
    state.current_estimate = estimate_tokens(&state.text);
    Ok(())
}

fn split_clauses(text: &str) -> Vec<&str> {
    text.split(['.', ';', '!', '?'])
        .map(|clause| clause.trim().trim_end_matches(','))
        .filter(|clause| !clause.is_empty())
        .collect()
}

fn render_brief(text: &str) -> String {
    let clauses = split_clauses(text);
    if clauses.is_empty() {
        return String::new();
    }
    format!("{}.", clauses.join("; "))
}

fn render_bullets(text: &str) -> String {
    split_clauses(text)
        .iter()
        .map(|clause| format!("- {clause}"))
        .collect::<Vec<_>>()
        .join("\n")
}
