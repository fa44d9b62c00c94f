//! Load test and synthetic probe for the weather service.
//!
//! The `run` mode drives virtual users that each repeat one iteration:
//! `GET {base}/weather/seattle`, evaluate the "status is 200 or 503" check,
//! then pause for a second. The `probe` mode performs a single validated
//! request and reports OK/FAIL through its exit code.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod runner;
pub mod scenarios;

pub use error::{LoadTestError, Result};
