use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AgError, Result};

/// Input length bounds, in characters.
pub const MAX_INPUT_CHARS: usize = 10_000;
/// Token budget bounds accepted from callers.
pub const MIN_TOKEN_BUDGET: u32 = 100;
pub const MAX_TOKEN_BUDGET: u32 = 8_000;

/// Requested optimization level. `Adaptive` is resolved to a concrete level
/// by the safety classifier before the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    Conservative,
    Standard,
    Aggressive,
    Adaptive,
}

/// Target output format applied by the decoding stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    Standard,
    Brief,
    BulletPoints,
}

/// Why a span is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanReason {
    Safety,
    Agricultural,
    Iso,
}

/// A substring that must survive every transformation stage verbatim.
///
/// Spans are immutable values; offsets are recomputed by exact substring
/// search after any text-altering stage, never carried across edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedSpan {
    /// Matched text as it appears in the message (original casing).
    pub keyword: String,
    /// Byte offset of the first match in the text the span was located in.
    pub offset: usize,
    pub reason: SpanReason,
}

/// A single optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub text: String,
    pub service: String,
    pub level: OptimizationLevel,
    pub format: MessageFormat,
    pub token_budget: u32,
    #[serde(default)]
    pub safety_critical: bool,
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl OptimizationRequest {
    /// Reject malformed input before any stage runs. These are the only
    /// errors surfaced to callers; everything downstream degrades to the
    /// fallback path instead of failing.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(AgError::EmptyInput);
        }
        let chars = self.text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(AgError::InputTooLong(chars));
        }
        if self.token_budget < MIN_TOKEN_BUDGET || self.token_budget > MAX_TOKEN_BUDGET {
            return Err(AgError::BudgetOutOfRange(self.token_budget));
        }
        Ok(())
    }
}

/// Outcome of a completed request (success or fallback).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub output: String,
    pub tokens_saved: usize,
    pub stages_completed: u8,
    pub compliance_maintained: bool,
    pub level_applied: OptimizationLevel,
    pub optimization_applied: bool,
    pub estimated_tokens: usize,
    pub budget_exceeded: bool,
    pub fallback_used: bool,
    pub metrics: HashMap<String, f64>,
}
