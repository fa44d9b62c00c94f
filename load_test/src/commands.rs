//! Command entry points
//!
//! Each command wires configuration, the scenario or probe, and reporting
//! together and returns the process exit code.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::cli::{ProbeArgs, RunArgs};
use crate::config::{get_run_profile, ScenarioConfig};
use crate::metrics::{reporter, MetricsCollector, RunSummary, Thresholds};
use crate::probe::{Probe, ProbeConfig};
use crate::runner;
use crate::scenarios::WeatherScenario;

/// Exit code when a configured threshold is not met
pub const THRESHOLDS_FAILED_EXIT_CODE: i32 = 99;

/// Run the weather load test
///
/// Blocks until the run duration elapses, the iteration budget is spent,
/// or Ctrl+C is pressed.
pub async fn run_load_test(args: RunArgs) -> Result<i32> {
    let config = ScenarioConfig::from_override(args.base_url.as_deref());
    let profile = get_run_profile(&args.profile);
    let plan = profile.plan(args.vus, args.duration, args.iterations);
    plan.validate()?;
    let thresholds = Thresholds::new(args.checks_threshold)?;

    let scenario = Arc::new(WeatherScenario::new(config)?);

    tracing::info!("Weather Load Test Starting...");
    tracing::info!("  Target: GET {}", scenario.target_url());
    tracing::info!("  Profile: {}", profile.name);
    tracing::info!("  Virtual Users: {}", plan.vus);
    tracing::info!("  Duration: {}s", plan.duration.as_secs());
    if let Some(iterations) = plan.iterations {
        tracing::info!("  Iterations: {}", iterations);
    }

    let collector = MetricsCollector::new();
    let stop = Arc::new(AtomicBool::new(false));

    let stop_clone = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl+C received, stopping after in-flight iterations");
            stop_clone.store(true, Ordering::Relaxed);
        }
    });

    let reporter_handle =
        reporter::spawn_periodic_reporter(collector.clone(), args.report_interval, stop.clone());

    let started_at = Utc::now();
    let report = runner::run(scenario.clone(), &plan, collector.clone(), stop.clone()).await?;
    stop.store(true, Ordering::Relaxed);
    // A live view drawn after this point would clear the final report
    if let Some(handle) = reporter_handle {
        reporter::shutdown_reporter(handle).await;
    }

    let summary = RunSummary::from_collector(
        &collector,
        scenario.target_url(),
        started_at,
        plan,
        thresholds,
    );
    reporter::print_final_report(&summary);

    if let Some(path) = &args.summary_export {
        summary
            .write_json(path)
            .with_context(|| format!("exporting summary of run {}", summary.run_id))?;
        tracing::info!("Summary written to {}", path.display());
    }

    tracing::info!("Load test complete: {} iterations", report.iterations);

    if !summary.thresholds_passed {
        tracing::error!(
            "Checks threshold not met: pass rate {:.4} below {:.4}",
            summary.checks_rate.unwrap_or_default(),
            thresholds.checks_rate.unwrap_or_default()
        );
        return Ok(THRESHOLDS_FAILED_EXIT_CODE);
    }

    Ok(0)
}

/// Run the synthetic probe once and print its verdict line
pub async fn run_probe(args: ProbeArgs) -> Result<i32> {
    let timeout = Duration::try_from_secs_f64(args.timeout)
        .with_context(|| format!("invalid probe timeout: {}", args.timeout))?;

    let config = ProbeConfig {
        base_url: args.base_url,
        city: args.city,
        timeout,
    };
    let probe = Probe::new(&config)?;

    let outcome = probe.run().await;
    println!("{}", outcome);

    Ok(outcome.exit_code())
}
