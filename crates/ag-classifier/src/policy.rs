//! Optimization level policy table.

use ag_core::types::OptimizationLevel;

/// Fixed per-level behavior profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProfile {
    pub level: OptimizationLevel,
    /// Fraction of the initial token estimate the pipeline may remove.
    pub target_reduction: f64,
    /// Whether the prompt-processing stage may strip filler phrases.
    pub format_optimization: bool,
}

/// Profile lookup. Values are fixed; aggressiveness orders
/// conservative < standard = adaptive baseline < aggressive.
pub fn profile(level: OptimizationLevel) -> LevelProfile {
    match level {
        OptimizationLevel::Conservative => LevelProfile {
            level,
            target_reduction: 0.15,
            format_optimization: false,
        },
        OptimizationLevel::Standard => LevelProfile {
            level,
            target_reduction: 0.30,
            format_optimization: true,
        },
        OptimizationLevel::Aggressive => LevelProfile {
            level,
            target_reduction: 0.50,
            format_optimization: true,
        },
        // Baseline only: the classifier resolves adaptive before the
        // pipeline asks for a profile.
        OptimizationLevel::Adaptive => LevelProfile {
            level,
            target_reduction: 0.30,
            format_optimization: true,
        },
    }
}
