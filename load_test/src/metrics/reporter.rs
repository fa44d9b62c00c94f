//! Console reporter for metrics with real-time updates

use super::collector::MetricsCollector;
use super::summary::RunSummary;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Spawn the periodic reporter; `None` when the live view is disabled
pub fn spawn_periodic_reporter(
    collector: MetricsCollector,
    interval_secs: u64,
    stop: Arc<AtomicBool>,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }
    Some(tokio::spawn(start_periodic_reporter(
        collector,
        interval_secs,
        stop,
    )))
}

/// Stop the live view for good, so nothing redraws over the final report.
///
/// Returns once the reporter task has actually ended.
pub async fn shutdown_reporter(handle: JoinHandle<()>) {
    handle.abort();
    if let Err(e) = handle.await {
        if !e.is_cancelled() {
            tracing::error!("Metrics reporter panicked: {}", e);
        }
    }
}

/// Start periodic metrics reporting (every N seconds) until `stop` is set
pub async fn start_periodic_reporter(
    collector: MetricsCollector,
    interval_secs: u64,
    stop: Arc<AtomicBool>,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; nothing to show yet
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if stop.load(Ordering::Relaxed) {
            break;
        }

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_latency_percentiles();
    let checks = metrics.check_totals();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║             Weather Load Test - Live Metrics                   ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!(
        "\n⏱️  Elapsed Time: {:02}:{:02}:{:02}    VUs: {}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60,
        metrics.vus.active
    );

    println!("\n┌─ ITERATIONS ────────────────────────────────────────────────┐");
    println!(
        "│  Completed:    {:>8}    Requests:   {:>8}              │",
        metrics.iterations.completed, metrics.http.requests
    );
    println!(
        "│  Checks OK:    {:>8}    Checks Bad: {:>8}              │",
        checks.passes, checks.fails
    );
    if let Some(rate) = checks.rate() {
        let throughput = if elapsed > 0 {
            metrics.http.requests as f64 / elapsed as f64
        } else {
            0.0
        };
        println!(
            "│  Check Rate:   {:>7.2}%    Throughput: {:>7.2}/sec        │",
            rate * 100.0,
            throughput
        );
    }
    println!("└─────────────────────────────────────────────────────────────┘");

    if latency.count > 0 {
        println!("\n┌─ REQUEST LATENCY (ms) ──────────────────────────────────────┐");
        println!(
            "│  Min: {:>7.2}  P50: {:>7.2}  P95: {:>7.2}  Max: {:>7.2}       │",
            latency.min, latency.p50, latency.p95, latency.max
        );
        println!(
            "│  Mean: {:>8.2} ms    Count: {:>10}                    │",
            latency.mean, latency.count
        );
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!(
        "│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to stop test]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}

/// Print final summary report
pub fn print_final_report(summary: &RunSummary) {
    println!("\n╔════════════════════════════════════════════════════════════════╗");
    println!("║                    FINAL TEST REPORT                           ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n🎯 TARGET");
    println!("   URL:                  {}", summary.target);
    println!("   Virtual Users:        {:>10}", summary.plan.vus);
    println!("   Iterations:           {:>10}", summary.iterations);

    println!("\n✅ CHECKS");
    for (name, check) in &summary.checks {
        let mark = if check.fails == 0 { "✓" } else { "✗" };
        println!("   {} {}", mark, name);
        println!(
            "      ↳ {:>6} passed / {:>6} failed",
            check.passes, check.fails
        );
    }
    if let Some(rate) = summary.checks_rate {
        println!("   Pass Rate:            {:>10.2}%", rate * 100.0);
    }

    println!("\n🌐 HTTP");
    println!("   Requests:             {:>10}", summary.http.requests);
    println!("   Transport Errors:     {:>10}", summary.http.transport_errors);
    for (status, count) in &summary.http.statuses {
        println!("   Status {}:            {:>10}", status, count);
    }
    if summary.elapsed_secs > 0.0 {
        let throughput = summary.http.requests as f64 / summary.elapsed_secs;
        println!("   Throughput:           {:>10.2} req/sec", throughput);
    }

    let latency = &summary.latency_ms;
    if latency.count > 0 {
        println!("\n📈 REQUEST LATENCY");
        println!("   Min:                  {:>10.2} ms", latency.min);
        println!("   P50 (Median):         {:>10.2} ms", latency.p50);
        println!("   P90:                  {:>10.2} ms", latency.p90);
        println!("   P95:                  {:>10.2} ms", latency.p95);
        println!("   P99:                  {:>10.2} ms", latency.p99);
        println!("   Max:                  {:>10.2} ms", latency.max);
        println!("   Mean:                 {:>10.2} ms", latency.mean);
    }

    if let Some(min) = summary.thresholds.checks_rate {
        let verdict = if summary.thresholds_passed { "PASSED" } else { "FAILED" };
        println!("\n🚦 THRESHOLDS");
        println!("   checks rate >= {:.2}:   {:>10}", min, verdict);
    }

    println!("\n⏱️  Test Duration: {:.2} seconds", summary.elapsed_secs);
    println!("════════════════════════════════════════════════════════════════\n");
}
