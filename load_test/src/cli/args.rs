use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Weather Load Testing Tool
#[derive(Parser, Debug)]
#[command(name = "weather-load-test")]
#[command(about = "Load test and synthetic probe for the weather service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Drive virtual users against GET /weather/seattle
    Run(RunArgs),

    /// Check the weather endpoint once and exit non-zero on failure
    Probe(ProbeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Base URL of the weather service (default: http://localhost:8000)
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Run profile: smoke, load, stress
    #[arg(long, default_value = "smoke")]
    pub profile: String,

    /// Number of virtual users (overrides the profile)
    #[arg(long)]
    pub vus: Option<usize>,

    /// Test duration in seconds (overrides the profile)
    #[arg(long)]
    pub duration: Option<u64>,

    /// Total iterations shared by all virtual users
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Metrics reporting interval in seconds, 0 disables the live view
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Minimum check pass rate (0.0-1.0); below it the run exits with code 99
    #[arg(long)]
    pub checks_threshold: Option<f64>,

    /// Write the end-of-run summary as JSON to this file
    #[arg(long)]
    pub summary_export: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Base URL of the weather service
    #[arg(
        long,
        default_value = "http://weather-api.weather.svc.cluster.local",
        env = "TARGET_BASE_URL"
    )]
    pub base_url: String,

    /// City to request
    #[arg(long, default_value = "London", env = "SYNTHETIC_CITY")]
    pub city: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "5", env = "SYNTHETIC_TIMEOUT_SECONDS")]
    pub timeout: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
