//! End-to-end tests for the `run` command against a mock weather service.

use weather_load_test::cli::RunArgs;
use weather_load_test::commands::{run_load_test, THRESHOLDS_FAILED_EXIT_CODE};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn run_args(base_url: String, iterations: u64) -> RunArgs {
    RunArgs {
        base_url: Some(base_url),
        profile: "smoke".to_string(),
        vus: Some(1),
        duration: Some(30),
        iterations: Some(iterations),
        report_interval: 0,
        checks_threshold: None,
        summary_export: None,
        verbose: false,
    }
}

#[tokio::test]
async fn test_run_exports_summary() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/seattle"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let summary_path = dir.path().join("summary.json");
    let args = RunArgs {
        summary_export: Some(summary_path.clone()),
        ..run_args(mock_server.uri(), 2)
    };

    let exit_code = run_load_test(args).await.expect("run failed");
    assert_eq!(exit_code, 0);

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["iterations"], 2);
    assert_eq!(summary["checks"]["status is 200 or 503"]["passes"], 2);
    assert_eq!(summary["checks"]["status is 200 or 503"]["fails"], 0);
    assert_eq!(summary["http"]["statuses"]["503"], 2);
    assert_eq!(
        summary["target"],
        format!("{}/weather/seattle", mock_server.uri())
    );
}

#[tokio::test]
async fn test_failing_checks_do_not_change_exit_code_without_threshold() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/seattle"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let exit_code = run_load_test(run_args(mock_server.uri(), 1)).await.unwrap();

    assert_eq!(exit_code, 0);
}

#[tokio::test]
async fn test_threshold_failure_sets_exit_code() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/seattle"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let args = RunArgs {
        checks_threshold: Some(0.5),
        ..run_args(mock_server.uri(), 1)
    };
    let exit_code = run_load_test(args).await.unwrap();

    assert_eq!(exit_code, THRESHOLDS_FAILED_EXIT_CODE);
}

#[tokio::test]
async fn test_invalid_threshold_is_rejected() {
    let args = RunArgs {
        checks_threshold: Some(2.0),
        ..run_args("http://127.0.0.1:1".to_string(), 1)
    };

    assert!(run_load_test(args).await.is_err());
}
