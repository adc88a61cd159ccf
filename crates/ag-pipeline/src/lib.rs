//! AgRelay optimization pipeline — four stages over request-local state.
//!
//! Stages:
//! 1. Pre-fill — whitespace normalization + initial token estimate
//! 2. Prompt processing — filler-phrase stripping outside protected spans
//! 3. Generation — lexical compression toward the profile target
//! 4. Decoding — target-format rendering + span integrity check
//!
//! Any stage failure routes to the fallback guard, which returns the
//! original message unmodified. Callers only ever see validation errors.

pub mod pipeline;
pub mod stage1_prefill;
pub mod stage2_prompt;
pub mod stage3_generation;
pub mod stage4_decoding;

pub use pipeline::{Optimizer, PipelineState, StageError};
