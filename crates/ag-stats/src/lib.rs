//! Process-wide optimization statistics.
//!
//! One counter set per service name plus a global set. Counters start
//! zeroed, are mutated only through [`StatsRegistry::record`], are never
//! persisted, and can be reset atomically. Reads return a point-in-time
//! snapshot.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// What a completed request contributes to the counters.
#[derive(Debug, Clone, Copy)]
pub struct RequestOutcome {
    pub tokens_saved: u64,
    /// Request carried a non-empty protected-span set.
    pub safety_preserved: bool,
    pub optimization_applied: bool,
    pub compliance_maintained: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct CounterSet {
    total_requests: u64,
    tokens_saved_total: u64,
    safety_preservations: u64,
    optimizations_applied: u64,
    compliant_requests: u64,
}

impl CounterSet {
    fn apply(&mut self, outcome: &RequestOutcome) {
        self.total_requests += 1;
        self.tokens_saved_total += outcome.tokens_saved;
        if outcome.safety_preserved {
            self.safety_preservations += 1;
        }
        if outcome.optimization_applied {
            self.optimizations_applied += 1;
        }
        if outcome.compliance_maintained {
            self.compliant_requests += 1;
        }
    }

    fn snapshot(&self) -> CounterSnapshot {
        let compliance_rate = if self.total_requests == 0 {
            1.0
        } else {
            self.compliant_requests as f64 / self.total_requests as f64
        };
        CounterSnapshot {
            total_requests: self.total_requests,
            tokens_saved_total: self.tokens_saved_total,
            safety_preservations: self.safety_preservations,
            optimizations_applied: self.optimizations_applied,
            compliance_rate,
        }
    }
}

/// Point-in-time view of one counter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub total_requests: u64,
    pub tokens_saved_total: u64,
    pub safety_preservations: u64,
    pub optimizations_applied: u64,
    pub compliance_rate: f64,
}

/// Global plus per-service counters, captured under a single read lock.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub global: CounterSnapshot,
    pub services: HashMap<String, CounterSnapshot>,
}

#[derive(Debug, Default)]
struct StatsInner {
    global: CounterSet,
    services: HashMap<String, CounterSet>,
}

/// Shared statistics registry. Cloning is cheap; clones share counters.
#[derive(Debug, Clone, Default)]
pub struct StatsRegistry {
    inner: Arc<RwLock<StatsInner>>,
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, service: &str, outcome: &RequestOutcome) {
        let mut inner = self.inner.write().unwrap();
        inner.global.apply(outcome);
        inner
            .services
            .entry(service.to_string())
            .or_default()
            .apply(outcome);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.read().unwrap();
        StatsSnapshot {
            global: inner.global.snapshot(),
            services: inner
                .services
                .iter()
                .map(|(name, set)| (name.clone(), set.snapshot()))
                .collect(),
        }
    }

    pub fn service(&self, name: &str) -> Option<CounterSnapshot> {
        self.inner
            .read()
            .unwrap()
            .services
            .get(name)
            .map(|set| set.snapshot())
    }

    /// Zero every counter set.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap();
        tracing::debug!(
            discarded_requests = inner.global.total_requests,
            "statistics reset"
        );
        *inner = StatsInner::default();
    }
}
