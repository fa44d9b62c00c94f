//! Virtual-user driver
//!
//! Runs a [`Scenario`] on `vus` independent tasks until the run duration
//! elapses, the shared iteration budget runs out, or a stop is requested.
//! Stops are only honoured between iterations, so an in-flight request
//! always completes and is recorded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, sleep_until, Instant};

use crate::config::RunPlan;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::scenarios::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Iterations completed across all virtual users
    pub iterations: u64,
}

pub async fn run<S: Scenario>(
    scenario: Arc<S>,
    plan: &RunPlan,
    collector: MetricsCollector,
    stop: Arc<AtomicBool>,
) -> Result<RunReport> {
    plan.validate()?;

    let deadline = Instant::now() + plan.duration;
    let budget = plan.iterations.map(|n| Arc::new(AtomicU64::new(n)));

    tracing::info!(
        "Starting {} virtual user(s) for {}s",
        plan.vus,
        plan.duration.as_secs()
    );

    let mut vu_handles = Vec::with_capacity(plan.vus);
    for vu in 1..=plan.vus {
        let handle = tokio::spawn(run_vu(
            vu,
            scenario.clone(),
            collector.clone(),
            deadline,
            budget.clone(),
            stop.clone(),
        ));
        vu_handles.push(handle);
    }

    let mut iterations = 0;
    for (idx, handle) in vu_handles.into_iter().enumerate() {
        match handle.await {
            Ok(completed) => iterations += completed,
            Err(e) => tracing::error!("Virtual user {} panicked: {}", idx + 1, e),
        }
    }

    tracing::info!("All virtual users finished after {} iterations", iterations);
    Ok(RunReport { iterations })
}

async fn run_vu<S: Scenario>(
    vu: usize,
    scenario: Arc<S>,
    collector: MetricsCollector,
    deadline: Instant,
    budget: Option<Arc<AtomicU64>>,
    stop: Arc<AtomicBool>,
) -> u64 {
    collector.vu_started();
    let mut completed = 0u64;

    loop {
        if Instant::now() >= deadline || stop.load(Ordering::Relaxed) {
            break;
        }
        if let Some(budget) = &budget {
            if !take_iteration(budget) {
                break;
            }
        }

        let outcome = scenario.execute().await;
        collector.record_request(outcome.latency, outcome.status);
        collector.record_check(scenario.check_name(), outcome.check_passed);
        collector.iteration_completed();
        completed += 1;

        if let Some(error) = &outcome.error {
            tracing::debug!("VU {} iteration {} failed: {}", vu, completed, error);
        }

        tokio::select! {
            _ = sleep(scenario.think_time()) => {}
            _ = sleep_until(deadline) => break,
        }
    }

    collector.vu_stopped();
    tracing::debug!("VU {} stopped after {} iterations", vu, completed);
    completed
}

/// Claim one iteration from the shared budget; false once it is exhausted.
fn take_iteration(budget: &AtomicU64) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadTestError;
    use crate::scenarios::IterationOutcome;
    use async_trait::async_trait;
    use std::time::Duration;

    struct CountingScenario {
        executed: AtomicU64,
        status: Option<u16>,
    }

    impl CountingScenario {
        fn new(status: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                executed: AtomicU64::new(0),
                status,
            })
        }
    }

    #[async_trait]
    impl Scenario for CountingScenario {
        fn check_name(&self) -> &str {
            "status is 200"
        }

        fn think_time(&self) -> Duration {
            Duration::from_secs(1)
        }

        async fn execute(&self) -> IterationOutcome {
            self.executed.fetch_add(1, Ordering::SeqCst);
            IterationOutcome {
                status: self.status,
                latency: Duration::from_millis(2),
                check_passed: self.status == Some(200),
                error: self.status.is_none().then(|| "connection refused".to_string()),
            }
        }
    }

    fn plan(vus: usize, secs: u64, iterations: Option<u64>) -> RunPlan {
        RunPlan {
            vus,
            duration: Duration::from_secs(secs),
            iterations,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_iteration_per_think_time() {
        let scenario = CountingScenario::new(Some(200));
        let collector = MetricsCollector::new();
        let stop = Arc::new(AtomicBool::new(false));

        let report = run(scenario.clone(), &plan(1, 3, None), collector.clone(), stop)
            .await
            .unwrap();

        assert_eq!(report.iterations, 3);
        assert_eq!(scenario.executed.load(Ordering::SeqCst), 3);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.http.requests, 3);
        assert_eq!(snapshot.iterations.completed, 3);
        assert_eq!(snapshot.checks["status is 200"].passes, 3);
        assert_eq!(snapshot.vus.active, 0);
        assert_eq!(snapshot.vus.max, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_vus_run_independently() {
        let scenario = CountingScenario::new(Some(200));
        let collector = MetricsCollector::new();
        let stop = Arc::new(AtomicBool::new(false));

        let report = run(scenario.clone(), &plan(4, 2, None), collector.clone(), stop)
            .await
            .unwrap();

        assert_eq!(report.iterations, 8);
        assert_eq!(collector.get_snapshot().vus.max, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_iteration_budget_is_shared() {
        let scenario = CountingScenario::new(Some(200));
        let collector = MetricsCollector::new();
        let stop = Arc::new(AtomicBool::new(false));

        let report = run(scenario.clone(), &plan(3, 60, Some(5)), collector, stop)
            .await
            .unwrap();

        assert_eq!(report.iterations, 5);
        assert_eq!(scenario.executed.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_vu() {
        let scenario = CountingScenario::new(None);
        let collector = MetricsCollector::new();
        let stop = Arc::new(AtomicBool::new(false));

        let report = run(scenario, &plan(1, 3, None), collector.clone(), stop)
            .await
            .unwrap();

        assert_eq!(report.iterations, 3);
        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.http.transport_errors, 3);
        assert_eq!(snapshot.checks["status is 200"].fails, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_flag_prevents_new_iterations() {
        let scenario = CountingScenario::new(Some(200));
        let stop = Arc::new(AtomicBool::new(true));

        let report = run(scenario.clone(), &plan(2, 30, None), MetricsCollector::new(), stop)
            .await
            .unwrap();

        assert_eq!(report.iterations, 0);
        assert_eq!(scenario.executed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_plan_is_rejected() {
        let scenario = CountingScenario::new(Some(200));
        let result = run(
            scenario,
            &plan(0, 30, None),
            MetricsCollector::new(),
            Arc::new(AtomicBool::new(false)),
        )
        .await;

        assert!(matches!(result, Err(LoadTestError::InvalidPlan(_))));
    }
}
