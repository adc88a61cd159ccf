//! Startup configuration surface. Populated once at process start and
//! treated as read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::OptimizationLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Per-service preset applied by collaborators before calling the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePreset {
    pub level: OptimizationLevel,
    pub priority: Priority,
    /// Safety services force the explicit safety-critical flag on every
    /// request regardless of what the caller supplied.
    #[serde(default)]
    pub force_safety_critical: bool,
}

/// Protected keyword lists, grouped by the reason tag they produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub safety: Vec<String>,
    pub agricultural: Vec<String>,
    pub iso: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        fn s(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            safety: s(&[
                "emergency", "stop", "halt", "safety", "critical", "hazard", "collision",
                "shutdown",
            ]),
            agricultural: s(&[
                "tractor",
                "equipment",
                "agricultural",
                "harvest",
                "implement",
                "field",
                "fleet",
                "coordination",
            ]),
            iso: s(&["iso", "isobus"]),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IsoCompliance {
    pub iso_11783: bool,
    pub iso_18497: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// When disabled, only safety-reason keywords are scanned; the
    /// agricultural and ISO vocabularies are skipped.
    pub agricultural_safety_mode: bool,
    pub default_level: OptimizationLevel,
    pub default_token_budget: u32,
    pub services: HashMap<String, ServicePreset>,
    pub keywords: KeywordConfig,
    pub iso_compliance: IsoCompliance,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let mut services = HashMap::new();
        services.insert(
            "equipment".to_string(),
            ServicePreset {
                level: OptimizationLevel::Conservative,
                priority: Priority::High,
                force_safety_critical: false,
            },
        );
        services.insert(
            "monitoring".to_string(),
            ServicePreset {
                level: OptimizationLevel::Standard,
                priority: Priority::Medium,
                force_safety_critical: false,
            },
        );
        services.insert(
            "fleet".to_string(),
            ServicePreset {
                level: OptimizationLevel::Aggressive,
                priority: Priority::Medium,
                force_safety_critical: false,
            },
        );
        services.insert(
            "safety".to_string(),
            ServicePreset {
                level: OptimizationLevel::Conservative,
                priority: Priority::High,
                force_safety_critical: true,
            },
        );
        Self {
            agricultural_safety_mode: true,
            default_level: OptimizationLevel::Standard,
            default_token_budget: 2_000,
            services,
            keywords: KeywordConfig::default(),
            iso_compliance: IsoCompliance {
                iso_11783: true,
                iso_18497: true,
            },
        }
    }
}
