// Scenarios module
// Contains the iteration contract driven by the runner and its implementations

pub mod weather;

use std::time::Duration;

use async_trait::async_trait;

pub use weather::{StatusCheck, WeatherScenario};

/// Result of one iteration, consumed by the runner and then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationOutcome {
    /// `None` when the request never produced a response
    pub status: Option<u16>,
    pub latency: Duration,
    pub check_passed: bool,
    pub error: Option<String>,
}

impl IterationOutcome {
    pub fn is_transport_error(&self) -> bool {
        self.status.is_none()
    }
}

/// One unit of virtual-user work.
///
/// `execute` must not fail: every problem is folded into the returned
/// outcome so that a single bad iteration never ends a virtual user.
#[async_trait]
pub trait Scenario: Send + Sync + 'static {
    /// Name of the check evaluated on every iteration
    fn check_name(&self) -> &str;

    /// Pause applied after each iteration
    fn think_time(&self) -> Duration;

    async fn execute(&self) -> IterationOutcome;
}
