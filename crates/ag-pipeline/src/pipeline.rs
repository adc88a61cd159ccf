//! Pipeline orchestrator and fallback guard.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use ag_classifier::{classify, profile, Classification, KeywordSet, LevelProfile};
use ag_core::config::OptimizerConfig;
use ag_core::types::{MessageFormat, OptimizationRequest, OptimizationResult, ProtectedSpan};
use ag_core::Result;
use ag_stats::{RequestOutcome, StatsRegistry};
use thiserror::Error;

use crate::{stage1_prefill, stage2_prompt, stage3_generation, stage4_decoding};

/// Internal stage failure. Never surfaces to callers: the fallback guard
/// converts it into a degraded result carrying the original message.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("protected span '{0}' lost during transformation")]
    SpanLost(String),
    #[error("transformation produced empty text")]
    EmptyOutput,
}

/// Request-local state threaded through the four stages.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub text: String,
    pub spans: Vec<ProtectedSpan>,
    pub initial_estimate: usize,
    pub current_estimate: usize,
    /// Index of the last stage that completed, 0 through 4.
    pub stages_completed: u8,
}

pub(crate) fn overlaps_any(range: Range<usize>, ranges: &[Range<usize>]) -> bool {
    ranges.iter().any(|r| range.start < r.end && r.start < range.end)
}

/// Optimizer facade: configuration, keyword table, and statistics registry.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: Arc<OptimizerConfig>,
    keywords: KeywordSet,
    stats: StatsRegistry,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        let keywords = KeywordSet::from_config(&config.keywords, !config.agricultural_safety_mode);
        Self {
            config: Arc::new(config),
            keywords,
            stats: StatsRegistry::new(),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsRegistry {
        &self.stats
    }

    /// Run the full pipeline for one request.
    ///
    /// Returns `Err` only for validation failures; those are not recorded
    /// in the statistics. Every other outcome, fallback included, yields
    /// `Ok` with the flags set accordingly.
    pub fn optimize(&self, req: &OptimizationRequest) -> Result<OptimizationResult> {
        req.validate()?;

        let classification = classify(&req.text, req.level, req.safety_critical, &self.keywords);
        let level_profile = profile(classification.effective_level);

        let mut state = PipelineState {
            text: req.text.clone(),
            spans: classification.spans.clone(),
            initial_estimate: 0,
            current_estimate: 0,
            stages_completed: 0,
        };

        let result = match run_stages(&mut state, &level_profile, req.format) {
            Ok(()) => {
                let budget_exceeded = state.current_estimate > req.token_budget as usize;
                if req.safety_critical && budget_exceeded {
                    tracing::warn!(
                        service = %req.service,
                        estimated = state.current_estimate,
                        budget = req.token_budget,
                        "safety-critical message over budget, reverting"
                    );
                    fallback_result(req, &classification, state.stages_completed)
                } else {
                    success_result(&classification, &state, budget_exceeded)
                }
            }
            Err(err) => {
                tracing::warn!(
                    service = %req.service,
                    stage = state.stages_completed + 1,
                    error = %err,
                    "stage failure, reverting"
                );
                fallback_result(req, &classification, state.stages_completed)
            }
        };

        self.stats.record(
            &req.service,
            &RequestOutcome {
                tokens_saved: result.tokens_saved as u64,
                safety_preserved: !classification.spans.is_empty(),
                optimization_applied: result.optimization_applied,
                compliance_maintained: result.compliance_maintained,
            },
        );
        Ok(result)
    }
}

fn run_stages(
    state: &mut PipelineState,
    level_profile: &LevelProfile,
    format: MessageFormat,
) -> std::result::Result<(), StageError> {
    stage1_prefill::run(state)?;
    state.stages_completed = 1;
    stage2_prompt::run(state, level_profile)?;
    state.stages_completed = 2;
    stage3_generation::run(state, level_profile)?;
    state.stages_completed = 3;
    stage4_decoding::run(state, format)?;
    state.stages_completed = 4;
    Ok(())
}

fn success_result(
    classification: &Classification,
    state: &PipelineState,
    budget_exceeded: bool,
) -> OptimizationResult {
    let tokens_saved = state.initial_estimate.saturating_sub(state.current_estimate);
    let compliance_maintained = state
        .spans
        .iter()
        .all(|span| state.text.contains(&span.keyword));
    OptimizationResult {
        output: state.text.clone(),
        tokens_saved,
        stages_completed: state.stages_completed,
        compliance_maintained,
        level_applied: classification.effective_level,
        optimization_applied: true,
        estimated_tokens: state.current_estimate,
        budget_exceeded,
        fallback_used: false,
        metrics: metrics(
            state.initial_estimate,
            state.current_estimate,
            classification.spans.len(),
        ),
    }
}

/// Degraded result: the caller gets the original message back, verbatim.
fn fallback_result(
    req: &OptimizationRequest,
    classification: &Classification,
    stages_completed: u8,
) -> OptimizationResult {
    let estimated = stage1_prefill::estimate_tokens(&req.text);
    OptimizationResult {
        output: req.text.clone(),
        tokens_saved: 0,
        stages_completed,
        compliance_maintained: true,
        level_applied: classification.effective_level,
        optimization_applied: false,
        estimated_tokens: estimated,
        budget_exceeded: estimated > req.token_budget as usize,
        fallback_used: true,
        metrics: metrics(estimated, estimated, classification.spans.len()),
    }
}

fn metrics(initial: usize, fin: usize, spans: usize) -> HashMap<String, f64> {
    let reduction = if initial == 0 {
        0.0
    } else {
        initial.saturating_sub(fin) as f64 / initial as f64
    };
    HashMap::from([
        ("initial_estimate".to_string(), initial as f64),
        ("final_estimate".to_string(), fin as f64),
        ("reduction".to_string(), reduction),
        ("protected_spans".to_string(), spans as f64),
    ])
}
