// Metrics module
// Collection, console reporting and end-of-run summaries

pub mod collector;
pub mod reporter;
pub mod summary;
pub mod types;

pub use collector::{LatencyStats, MetricsCollector};
pub use summary::{RunSummary, Thresholds};
pub use types::{CheckMetrics, TestMetrics};
