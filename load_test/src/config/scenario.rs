//! Scenario configuration, resolved once at startup and injected into the scenario.

use std::time::Duration;

/// Base URL used when no override is supplied
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Path requested on every iteration
pub const TARGET_PATH: &str = "/weather/seattle";

/// Pause between iterations of the same virtual user
pub const THINK_TIME: Duration = Duration::from_secs(1);

/// Request timeout when nothing else is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub base_url: String,
    pub path: &'static str,
    pub think_time: Duration,
    pub request_timeout: Duration,
}

impl ScenarioConfig {
    /// Resolve the effective base URL from an optional override.
    ///
    /// Absent and empty overrides fall back to [`DEFAULT_BASE_URL`]; anything
    /// else, whitespace included, is used verbatim.
    pub fn from_override(base_url: Option<&str>) -> Self {
        let base_url = match base_url {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => DEFAULT_BASE_URL.to_string(),
        };

        Self {
            base_url,
            path: TARGET_PATH,
            think_time: THINK_TIME,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Plain concatenation of base URL and path, no slash normalisation.
    pub fn target_url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::from_override(None)
    }
}
