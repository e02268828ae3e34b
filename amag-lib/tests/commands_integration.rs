//! Integration tests for the command-line surface.
//!
//! These only exercise paths that fail or finish before any request leaves the process, so they
//! need neither credentials nor network access.

use amag_lib::Host;
use camino::Utf8PathBuf;
use std::fs;

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

const SCOPE: &str =
    "/subscriptions/64f552d2-406c-4842-836f-6cd00c086f7e/resourceGroups/g/providers/Microsoft.OperationalInsights/workspaces/w";

fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().join(name)).unwrap()
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_init_then_validate() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");

    let mut host = TestHost::new();
    amag_lib::run(&mut host, ["amag", "--config", config.as_str(), "init"]).await.unwrap();
    assert!(config.exists());
    assert!(host.output_str().contains("Generated default configuration file"));

    let mut host = TestHost::new();
    amag_lib::run(&mut host, ["amag", "--config", config.as_str(), "validate"]).await.unwrap();
    let output = host.output_str();
    assert!(output.contains("Configuration file is valid"), "{output}");
    assert!(output.contains(config.as_str()), "{output}");
    assert_eq!(host.exit_code, None);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_init_twice_fails_without_force() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");

    let mut host = TestHost::new();
    amag_lib::run(&mut host, ["amag", "init", config.as_str()]).await.unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(&mut host, ["amag", "init", config.as_str()]).await.unwrap_err();
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("--force"), "{}", host.error_str());

    let mut host = TestHost::new();
    amag_lib::run(&mut host, ["amag", "init", "--force", config.as_str()]).await.unwrap();
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_config_set_is_picked_up_by_validate() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");

    let mut host = TestHost::new();
    amag_lib::run(
        &mut host,
        ["amag", "--config", config.as_str(), "config", "set", "metric.scope_resource_id", SCOPE],
    )
    .await
    .unwrap();
    assert!(fs::read_to_string(&config).unwrap().contains(SCOPE));

    let mut host = TestHost::new();
    amag_lib::run(&mut host, ["amag", "--config", config.as_str(), "validate"]).await.unwrap();
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_config_set_rejects_invalid_scope() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        ["amag", "--config", config.as_str(), "config", "set", "metric.scope_resource_id", "invalid"],
    )
    .await
    .unwrap_err();

    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().starts_with("❌"), "{}", host.error_str());
    assert!(!config.exists());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_metric_without_workspace_id_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");
    let query = temp_path(&tmp, "q.kql");
    fs::write(&config, "[metric]\nregion = \"westeurope\"\n").unwrap();
    fs::write(&query, "AppRequests | take 1").unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        [
            "amag",
            "--config",
            config.as_str(),
            "metric",
            "--file",
            query.as_str(),
            "--metric",
            "Requests",
            "--scope-resource-id",
            SCOPE,
        ],
    )
    .await
    .unwrap_err();

    let error = host.error_str();
    assert_eq!(host.exit_code, Some(1));
    assert!(error.contains("workspace id"), "{error}");
    assert!(error.contains("--workspace-id"), "{error}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_metric_with_invalid_scope_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");
    let query = temp_path(&tmp, "q.kql");
    fs::write(&config, "").unwrap();
    fs::write(&query, "AppRequests | take 1").unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        [
            "amag",
            "--config",
            config.as_str(),
            "metric",
            "-f",
            query.as_str(),
            "-m",
            "Requests",
            "-w",
            "ws-1",
            "-s",
            "invalid",
        ],
    )
    .await
    .unwrap_err();

    let error = host.error_str();
    assert!(error.contains("invalid"), "{error}");
    assert!(error.contains("resource or subresource scope"), "{error}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_log_with_empty_query_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");
    let query = temp_path(&tmp, "q.kql");
    fs::write(&config, "").unwrap();
    fs::write(&query, "\n\n").unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        [
            "amag",
            "--config",
            config.as_str(),
            "log",
            "-f",
            query.as_str(),
            "-m",
            "Queue",
            "-w",
            "ws-1",
            "-e",
            "https://dce.westeurope-1.ingest.monitor.azure.com",
            "-r",
            "dcr-00000000000000000000000000000000",
            "-s",
            "Custom-Amag_CL",
        ],
    )
    .await
    .unwrap_err();

    let error = host.error_str();
    assert!(error.contains("is empty"), "{error}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_metric_with_blank_metric_name_fails_up_front() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");
    let query = temp_path(&tmp, "q.kql");
    fs::write(&config, "").unwrap();
    fs::write(&query, "AppRequests | take 1").unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        [
            "amag",
            "--config",
            config.as_str(),
            "metric",
            "--file",
            query.as_str(),
            "--metric",
            "",
            "--workspace-id",
            "ws-1",
            "--scope-resource-id",
            SCOPE,
        ],
    )
    .await
    .unwrap_err();

    let error = host.error_str();
    assert_eq!(host.exit_code, Some(1));
    assert!(error.contains("no metric name given"), "{error}");
    assert!(error.contains("--metric"), "{error}");
    assert!(error.contains("AMAG_METRIC"), "{error}");
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_log_with_blank_metric_name_fails_up_front() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");
    let query = temp_path(&tmp, "q.kql");
    fs::write(&config, "").unwrap();
    fs::write(&query, "AppRequests | take 1").unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        [
            "amag",
            "--config",
            config.as_str(),
            "log",
            "-f",
            query.as_str(),
            "-m",
            "  ",
            "-w",
            "ws-1",
            "-e",
            "https://dce.westeurope-1.ingest.monitor.azure.com",
            "-r",
            "dcr-1",
            "-s",
            "Custom-Amag_CL",
        ],
    )
    .await
    .unwrap_err();

    assert!(host.error_str().contains("AMAG_METRIC"), "{}", host.error_str());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_metric_with_invalid_region_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let config = temp_path(&tmp, "config.toml");
    let query = temp_path(&tmp, "q.kql");
    fs::write(&config, "").unwrap();
    fs::write(&query, "AppRequests | take 1").unwrap();

    let mut host = TestHost::new();
    let _ = amag_lib::run(
        &mut host,
        [
            "amag",
            "--config",
            config.as_str(),
            "metric",
            "-f",
            query.as_str(),
            "-m",
            "Requests",
            "-w",
            "ws-1",
            "-s",
            SCOPE,
            "--region",
            "evil.example.com/x",
        ],
    )
    .await
    .unwrap_err();

    let error = host.error_str();
    assert!(error.contains("--region"), "{error}");
    assert!(error.contains("evil.example.com/x"), "{error}");
}
