//! End-of-run summary and threshold evaluation

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::collector::{LatencyStats, MetricsCollector};
use super::types::{CheckMetrics, HttpMetrics};
use crate::config::RunPlan;
use crate::error::{LoadTestError, Result};

/// Pass/fail criteria applied to a finished run. Nothing is enforced by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Thresholds {
    /// Minimum share of passing check evaluations
    pub checks_rate: Option<f64>,
}

impl Thresholds {
    pub fn new(checks_rate: Option<f64>) -> Result<Self> {
        if let Some(rate) = checks_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(LoadTestError::InvalidThreshold(rate));
            }
        }
        Ok(Self { checks_rate })
    }

    /// A run with no check evaluations has nothing to fail.
    pub fn evaluate(&self, checks: &CheckMetrics) -> bool {
        match (self.checks_rate, checks.rate()) {
            (Some(min), Some(rate)) => rate >= min,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub plan: RunPlan,
    pub iterations: u64,
    pub max_vus: usize,
    pub checks: BTreeMap<String, CheckMetrics>,
    pub checks_rate: Option<f64>,
    pub http: HttpMetrics,
    pub latency_ms: LatencyStats,
    pub thresholds: Thresholds,
    pub thresholds_passed: bool,
}

impl RunSummary {
    pub fn from_collector(
        collector: &MetricsCollector,
        target: &str,
        started_at: DateTime<Utc>,
        plan: RunPlan,
        thresholds: Thresholds,
    ) -> Self {
        let metrics = collector.get_snapshot();
        let totals = metrics.check_totals();

        Self {
            run_id: Uuid::new_v4(),
            target: target.to_string(),
            started_at,
            elapsed_secs: collector.elapsed().as_secs_f64(),
            plan,
            iterations: metrics.iterations.completed,
            max_vus: metrics.vus.max,
            checks_rate: totals.rate(),
            thresholds_passed: thresholds.evaluate(&totals),
            checks: metrics.checks,
            http: metrics.http,
            latency_ms: collector.get_latency_percentiles(),
            thresholds,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| LoadTestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn checks(passes: u64, fails: u64) -> CheckMetrics {
        CheckMetrics { passes, fails }
    }

    #[test]
    fn test_no_threshold_always_passes() {
        let thresholds = Thresholds::default();
        assert!(thresholds.evaluate(&checks(0, 10)));
    }

    #[test]
    fn test_checks_rate_threshold() {
        let thresholds = Thresholds::new(Some(0.9)).unwrap();
        assert!(thresholds.evaluate(&checks(9, 1)));
        assert!(!thresholds.evaluate(&checks(8, 2)));
        assert!(thresholds.evaluate(&checks(0, 0)));
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(matches!(
            Thresholds::new(Some(1.5)),
            Err(LoadTestError::InvalidThreshold(_))
        ));
        assert!(Thresholds::new(Some(-0.1)).is_err());
        assert!(Thresholds::new(Some(1.0)).is_ok());
    }

    #[test]
    fn test_summary_from_collector() {
        let collector = MetricsCollector::new();
        collector.vu_started();
        collector.record_request(Duration::from_millis(3), Some(200));
        collector.record_check("status is 200 or 503", true);
        collector.iteration_completed();
        collector.record_request(Duration::from_millis(4), Some(404));
        collector.record_check("status is 200 or 503", false);
        collector.iteration_completed();

        let plan = RunPlan {
            vus: 1,
            duration: Duration::from_secs(30),
            iterations: None,
        };
        let summary = RunSummary::from_collector(
            &collector,
            "http://localhost:8000/weather/seattle",
            Utc::now(),
            plan,
            Thresholds::new(Some(0.75)).unwrap(),
        );

        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.max_vus, 1);
        assert_eq!(summary.checks_rate, Some(0.5));
        assert!(!summary.thresholds_passed);
        assert_eq!(summary.http.requests, 2);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["plan"]["vus"], 1);
        assert_eq!(json["plan"]["duration"], 30.0);
        assert_eq!(json["checks"]["status is 200 or 503"]["fails"], 1);
        assert_eq!(json["http"]["statuses"]["404"], 1);
    }
}
