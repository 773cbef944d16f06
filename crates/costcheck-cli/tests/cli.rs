//! Binary tests for commands that do not need a browser.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// `costcheck` run from an empty directory with no `COSTCHECK_*` overrides.
fn costcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("costcheck").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("COSTCHECK_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

#[test]
fn test_help_describes_the_check() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Miscellaneous Costs"))
        .stdout(predicate::str::contains("routes"));
}

#[test]
fn test_routes_lists_the_stub_table() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains(".*/api/products/123$"))
        .stdout(predicate::str::contains(".*/api/chat/unread-count"))
        .stdout(predicate::str::contains(r#"{"count":0}"#));
}

#[test]
fn test_routes_json_uses_product_id() {
    let dir = TempDir::new().unwrap();
    let output = costcheck(&dir)
        .args(["routes", "--json", "--product-id", "42"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["pattern"], ".*/api/products/42$");
    assert_eq!(rows[0]["status"], 200);
    assert_eq!(rows[0]["body"]["sku"], "SKU-42");
}

#[test]
fn test_routes_reads_product_id_from_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("costcheck.json"), r#"{"productId": 9}"#).unwrap();

    costcheck(&dir)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains(".*/api/audits/PRODUCT/9"));
}

#[test]
fn test_routes_product_id_from_env() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir)
        .env("COSTCHECK_PRODUCT_ID", "77")
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains(".*/api/products/77/sales-history"));
}

#[test]
fn test_run_rejects_relative_base_url_before_launch() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir)
        .args(["run", "--base-url", "localhost:5173"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("baseUrl"));
}

#[test]
fn test_run_reports_missing_config_file() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir)
        .args(["run", "--config", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_run_reports_missing_chrome() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir)
        .args(["run", "--chrome-path", "/definitely/not/chrome"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let dir = TempDir::new().unwrap();
    costcheck(&dir).args(["-v", "-q", "routes"]).assert().failure();
}
