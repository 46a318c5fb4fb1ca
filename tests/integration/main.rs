//! Integration tests for the rubick binary

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Nothing listens on the discard port
    const DEAD_BACKEND: &str = "http://127.0.0.1:9/api/v1";

    /// Command isolated from the user's config and state
    fn rubick(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("rubick");
        cmd.env("RUBICK_CONFIG", home.path().join("config.toml"))
            .env("XDG_STATE_HOME", home.path().join("state"))
            .env("XDG_DATA_HOME", home.path().join("data"))
            .env_remove("RUBICK_API_URL")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("resources"))
            .stdout(predicate::str::contains("browse"))
            .stdout(predicate::str::contains("container"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rubick"));
    }

    #[test]
    fn config_path_honors_env() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[api]"))
            .stdout(predicate::str::contains("abort_superseded = true"));
    }

    #[test]
    fn config_init_then_refuse() {
        let home = TempDir::new().unwrap();
        rubick(&home).args(["config", "init"]).assert().success();
        assert!(home.path().join("config.toml").exists());

        rubick(&home)
            .args(["config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"))
            .stderr(predicate::str::contains("--force"));

        rubick(&home)
            .args(["config", "init", "--force"])
            .assert()
            .success();
    }

    #[test]
    fn invalid_config_is_reported() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[api\n").unwrap();
        rubick(&home)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn hosts_with_unreachable_backend_fails_with_hint() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["hosts", "--api-url", DEAD_BACKEND])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Backend request failed"))
            .stderr(predicate::str::contains("--api-url"));
    }

    #[test]
    fn api_url_from_env() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .env("RUBICK_API_URL", DEAD_BACKEND)
            .args(["resources", "--format", "json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("127.0.0.1:9"));
    }

    #[test]
    fn browse_requires_terminal() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["browse", "--api-url", DEAD_BACKEND])
            .assert()
            .failure()
            .stderr(predicate::str::contains("interactive terminal"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["resources", "--kind", "pods"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown resource kind"));
    }

    #[test]
    fn container_action_needs_backend() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["container", "stop", "web", "--timeout", "3", "--api-url", DEAD_BACKEND])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Backend request failed"))
            .stderr(predicate::str::contains("--api-url"));
    }

    #[test]
    fn container_without_target_is_usage_error() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["container", "remove"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("<CONTAINER>"));
    }

    #[test]
    fn host_test_needs_backend() {
        let home = TempDir::new().unwrap();
        rubick(&home)
            .args(["test", "edge", "--api-url", DEAD_BACKEND])
            .assert()
            .failure()
            .stderr(predicate::str::contains("127.0.0.1:9"));
    }

    #[test]
    fn zero_timeout_config_is_rejected() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[api]\ntimeout_secs = 0\n").unwrap();
        rubick(&home)
            .args(["status"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("timeout_secs"));
    }
}
