//! Shared types, validation errors, and startup configuration for the
//! AgRelay message optimizer.

pub mod config;
pub mod error;
pub mod types;

pub use config::OptimizerConfig;
pub use error::{AgError, Result};
pub use types::{
    MessageFormat, OptimizationLevel, OptimizationRequest, OptimizationResult, ProtectedSpan,
    SpanReason,
};
