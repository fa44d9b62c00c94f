//! Metric types

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckMetrics {
    pub passes: u64,
    pub fails: u64,
}

impl CheckMetrics {
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }

    /// Share of passing evaluations, `None` until the check has run once
    pub fn rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.passes as f64 / total as f64),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpMetrics {
    pub requests: u64,
    pub transport_errors: u64,
    /// Responses received, keyed by status code
    pub statuses: BTreeMap<u16, u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IterationMetrics {
    pub completed: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VuMetrics {
    pub active: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestMetrics {
    /// Keyed by check name
    pub checks: BTreeMap<String, CheckMetrics>,
    pub http: HttpMetrics,
    pub iterations: IterationMetrics,
    pub vus: VuMetrics,
    pub system: SystemMetrics,
}

impl TestMetrics {
    /// Passes and fails summed over every check
    pub fn check_totals(&self) -> CheckMetrics {
        self.checks
            .values()
            .fold(CheckMetrics::default(), |acc, check| CheckMetrics {
                passes: acc.passes + check.passes,
                fails: acc.fails + check.fails,
            })
    }
}
