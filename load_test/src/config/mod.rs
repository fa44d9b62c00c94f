// Configuration module
// Scenario settings and named run profiles

pub mod run_profiles;
pub mod scenario;

pub use run_profiles::{get_run_profile, RunPlan, RunProfile};
pub use scenario::{ScenarioConfig, DEFAULT_BASE_URL, TARGET_PATH, THINK_TIME};
