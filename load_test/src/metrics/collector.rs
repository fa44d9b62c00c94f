//! Metrics collector - thread-safe collection with latency tracking

use super::types::TestMetrics;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TestMetrics>>,
    // Microseconds, so that sub-millisecond local responses are not flattened to zero
    request_latencies: Arc<RwLock<Histogram<u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // Create histogram with 3 significant digits of precision
        let request_hist = Histogram::new(3).expect("Failed to create request histogram");

        // Initialize system monitor
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TestMetrics::default())),
            request_latencies: Arc::new(RwLock::new(request_hist)),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn vu_started(&self) {
        let mut metrics = self.metrics.write();
        metrics.vus.active += 1;
        metrics.vus.max = metrics.vus.max.max(metrics.vus.active);
    }

    pub fn vu_stopped(&self) {
        let mut metrics = self.metrics.write();
        metrics.vus.active = metrics.vus.active.saturating_sub(1);
    }

    /// Record one HTTP request; `status` is `None` for transport failures.
    pub fn record_request(&self, latency: Duration, status: Option<u16>) {
        let mut metrics = self.metrics.write();
        metrics.http.requests += 1;
        match status {
            Some(code) => *metrics.http.statuses.entry(code).or_insert(0) += 1,
            None => metrics.http.transport_errors += 1,
        }
        drop(metrics);

        // Failed requests still count towards latency
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        if let Err(e) = self.request_latencies.write().record(micros) {
            tracing::debug!("Dropped latency sample {}us: {}", micros, e);
        }
    }

    pub fn record_check(&self, name: &str, passed: bool) {
        let mut metrics = self.metrics.write();
        let check = metrics.checks.entry(name.to_string()).or_default();
        if passed {
            check.passes += 1;
        } else {
            check.fails += 1;
        }
    }

    pub fn iteration_completed(&self) {
        self.metrics.write().iterations.completed += 1;
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();

        // Get global CPU usage
        metrics.system.cpu_usage = system.global_cpu_usage();

        // Get memory usage
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TestMetrics {
        self.metrics.read().clone()
    }

    pub fn get_latency_percentiles(&self) -> LatencyStats {
        let hist = self.request_latencies.read();
        let ms = |micros: u64| micros as f64 / 1000.0;
        LatencyStats {
            min: ms(hist.min()),
            p50: ms(hist.value_at_quantile(0.50)),
            p90: ms(hist.value_at_quantile(0.90)),
            p95: ms(hist.value_at_quantile(0.95)),
            p99: ms(hist.value_at_quantile(0.99)),
            max: ms(hist.max()),
            mean: hist.mean() / 1000.0,
            count: hist.len(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Request latency distribution in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct LatencyStats {
    pub min: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
}
