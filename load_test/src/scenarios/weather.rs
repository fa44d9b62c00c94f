//! Weather scenario - one GET to the Seattle forecast per iteration

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;

use super::{IterationOutcome, Scenario};
use crate::config::ScenarioConfig;
use crate::error::{LoadTestError, Result};

/// The single named check of the weather scenario.
///
/// 503 counts as a pass: the service is expected to shed load with
/// "service unavailable" when its upstream is down.
pub struct StatusCheck;

impl StatusCheck {
    pub const NAME: &'static str = "status is 200 or 503";

    pub fn evaluate(status: Option<u16>) -> bool {
        matches!(status, Some(200) | Some(503))
    }
}

pub struct WeatherScenario {
    client: Client,
    target_url: String,
    think_time: Duration,
}

impl WeatherScenario {
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(LoadTestError::HttpClient)?;

        Ok(Self {
            client,
            target_url: config.target_url(),
            think_time: config.think_time,
        })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

#[async_trait]
impl Scenario for WeatherScenario {
    fn check_name(&self) -> &str {
        StatusCheck::NAME
    }

    fn think_time(&self) -> Duration {
        self.think_time
    }

    async fn execute(&self) -> IterationOutcome {
        let start = Instant::now();

        let (status, error) = match self.client.get(&self.target_url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the body so the connection can be reused
                if let Err(e) = response.bytes().await {
                    tracing::debug!("Failed to read response body: {}", e);
                }
                (Some(status), None)
            }
            Err(e) => {
                tracing::debug!("Request to {} failed: {}", self.target_url, e);
                (None, Some(e.to_string()))
            }
        };

        IterationOutcome {
            status,
            latency: start.elapsed(),
            check_passed: StatusCheck::evaluate(status),
            error,
        }
    }
}
