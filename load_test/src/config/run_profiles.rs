use std::time::Duration;

use crate::error::{LoadTestError, Result};

/// How many virtual users to run, and for how long.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RunPlan {
    pub vus: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    /// Total iterations shared across all VUs; `None` means run until the duration elapses
    pub iterations: Option<u64>,
}

impl RunPlan {
    pub fn validate(&self) -> Result<()> {
        if self.vus == 0 {
            return Err(LoadTestError::InvalidPlan(
                "at least one virtual user is required".to_string(),
            ));
        }
        if self.duration.is_zero() {
            return Err(LoadTestError::InvalidPlan(
                "duration must be greater than zero".to_string(),
            ));
        }
        if self.iterations == Some(0) {
            return Err(LoadTestError::InvalidPlan(
                "iterations must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

fn serialize_secs<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// A named preset of virtual users and run duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProfile {
    pub name: &'static str,
    pub vus: usize,
    pub duration: Duration,
}

impl RunProfile {
    /// Build a plan from this profile, letting explicit values win.
    pub fn plan(
        &self,
        vus: Option<usize>,
        duration_secs: Option<u64>,
        iterations: Option<u64>,
    ) -> RunPlan {
        RunPlan {
            vus: vus.unwrap_or(self.vus),
            duration: duration_secs
                .map(Duration::from_secs)
                .unwrap_or(self.duration),
            iterations,
        }
    }
}

/// Get a run profile by name
pub fn get_run_profile(profile: &str) -> RunProfile {
    match profile {
        "smoke" => smoke_profile(),
        "load" => load_profile(),
        "stress" => stress_profile(),
        _ => {
            tracing::warn!("Unknown profile '{}', using 'smoke' profile", profile);
            smoke_profile()
        }
    }
}

/// Smoke profile, the default
///
/// A single virtual user for 30 seconds. Enough to tell whether the
/// service answers at all without putting it under pressure.
pub fn smoke_profile() -> RunProfile {
    RunProfile {
        name: "smoke",
        vus: 1,
        duration: Duration::from_secs(30),
    }
}

/// Load profile
///
/// - 10 virtual users
/// - 5 minutes
pub fn load_profile() -> RunProfile {
    RunProfile {
        name: "load",
        vus: 10,
        duration: Duration::from_secs(5 * 60),
    }
}

/// Stress profile
///
/// - 50 virtual users
/// - 10 minutes
pub fn stress_profile() -> RunProfile {
    RunProfile {
        name: "stress",
        vus: 50,
        duration: Duration::from_secs(10 * 60),
    }
}
