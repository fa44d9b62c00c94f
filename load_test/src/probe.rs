//! Synthetic probe - one request against the weather endpoint, validated end to end
//!
//! Unlike the load scenario, the probe only accepts a 200 response whose
//! body carries every field of the weather payload.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;

use crate::error::{LoadTestError, Result};

/// Fields every weather payload must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["temperature", "conditions", "humidity", "wind_speed"];

/// Exit code reported for any probe failure
pub const FAILURE_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub base_url: String,
    pub city: String,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn url(&self) -> String {
        format!("{}/weather/{}", self.base_url, self.city)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Ok { latency_ms: f64 },
    UnexpectedStatus { status: u16, body: String },
    MissingField { field: String, body: String },
    Exception { error: String },
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeOutcome::Ok { .. })
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_ok() {
            0
        } else {
            FAILURE_EXIT_CODE
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Ok { latency_ms } => write!(f, "OK latency_ms={:.1}", latency_ms),
            ProbeOutcome::UnexpectedStatus { status, body } => {
                write!(f, "FAIL status={} body={}", status, body)
            }
            ProbeOutcome::MissingField { field, body } => {
                write!(f, "FAIL missing_field={} body={}", field, body)
            }
            ProbeOutcome::Exception { error } => write!(f, "FAIL exception={}", error),
        }
    }
}

pub struct Probe {
    client: Client,
    url: String,
}

impl Probe {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LoadTestError::HttpClient)?;

        Ok(Self {
            client,
            url: config.url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform the check. Every failure mode is folded into the outcome.
    pub async fn run(&self) -> ProbeOutcome {
        let start = Instant::now();
        tracing::debug!("Probing {}", self.url);

        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::Exception { error: e.to_string() },
        };
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return ProbeOutcome::Exception { error: e.to_string() },
        };

        if status != 200 {
            return ProbeOutcome::UnexpectedStatus { status, body };
        }

        if let Err(outcome) = validate_payload(&body) {
            return outcome;
        }

        ProbeOutcome::Ok {
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

fn validate_payload(body: &str) -> std::result::Result<(), ProbeOutcome> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ProbeOutcome::Exception {
            error: e.to_string(),
        })?;

    let Some(object) = value.as_object() else {
        return Err(ProbeOutcome::Exception {
            error: "response body is not a JSON object".to_string(),
        });
    };

    match REQUIRED_FIELDS.iter().find(|field| !object.contains_key(**field)) {
        Some(field) => Err(ProbeOutcome::MissingField {
            field: field.to_string(),
            body: body.to_string(),
        }),
        None => Ok(()),
    }
}
