//! Safety classifier and optimization level policy.
//!
//! Resolves the effective optimization level for a request up front and
//! produces the protected-span list the pipeline must preserve. The pipeline
//! itself never branches on `adaptive`; it is resolved here, once.

pub mod keywords;
pub mod policy;

pub use keywords::{protected_ranges, relocate, KeywordSet};
pub use policy::{profile, LevelProfile};

use ag_core::types::{OptimizationLevel, ProtectedSpan};

/// Classifier output: the level actually applied plus the spans to protect.
#[derive(Debug, Clone)]
pub struct Classification {
    pub effective_level: OptimizationLevel,
    pub spans: Vec<ProtectedSpan>,
    /// True when the effective level differs from the requested one.
    pub overridden: bool,
}

/// Resolve the effective level for a request.
///
/// An explicit safety-critical flag always forces `conservative`. Adaptive
/// requests drop to `conservative` on any keyword match and to the
/// `standard` baseline otherwise. Other levels pass through unchanged; their
/// spans are still protected.
pub fn classify(
    text: &str,
    requested: OptimizationLevel,
    safety_critical: bool,
    keywords: &KeywordSet,
) -> Classification {
    let spans = keywords.scan(text);

    let effective = if safety_critical {
        OptimizationLevel::Conservative
    } else if requested == OptimizationLevel::Adaptive {
        if spans.is_empty() {
            OptimizationLevel::Standard
        } else {
            OptimizationLevel::Conservative
        }
    } else {
        requested
    };

    let overridden = effective != requested;
    if overridden {
        tracing::debug!(
            requested = ?requested,
            effective = ?effective,
            spans = spans.len(),
            "classifier override"
        );
    }

    Classification {
        effective_level: effective,
        spans,
        overridden,
    }
}
