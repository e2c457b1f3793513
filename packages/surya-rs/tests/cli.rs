//! Integration tests for the CLI commands

use assert_cmd::cargo::cargo_bin_cmd;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use predicates::prelude::*;
use std::path::Path;
use tokio::net::TcpListener;

const ENV_VARS: &[&str] = &[
    "SURYA_ENDPOINT",
    "SURYA_AUTH_TOKEN",
    "SURYA_TIMEOUT_SECS",
    "SURYA_MIME_TYPE",
    "RUST_LOG",
];

async fn serve(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route("/ocr", post(move || async move { (status, body) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/ocr", addr)
}

fn write_images(dir: &Path) {
    std::fs::write(dir.join("page-1.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    std::fs::write(dir.join("page-2.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
}

fn surya(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("surya");
    cmd.current_dir(dir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_version_command() {
    let mut cmd = cargo_bin_cmd!("surya");
    cmd.arg("version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("surya "));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("surya");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("surya "));
}

#[test]
fn test_version_short_flag() {
    let mut cmd = cargo_bin_cmd!("surya");
    cmd.arg("-V");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("surya "));
}

#[test]
fn test_ocr_without_endpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path());

    surya(dir.path())
        .args(["ocr", "page-1.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SURYA_ENDPOINT"));
}

#[test]
fn test_ocr_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    surya(dir.path())
        .args(["ocr", "--endpoint", "http://127.0.0.1:9/ocr", "nope.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.png"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ocr_prints_text_per_page() {
    let endpoint = serve(StatusCode::OK, r#"{"text": "Hello from Surya"}"#).await;
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path());

    tokio::task::spawn_blocking(move || {
        surya(dir.path())
            .args(["ocr", "--quiet", "-e", endpoint.as_str(), "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("--- page 1 (./page-1.jpg) ---\nHello from Surya\n"))
            .stdout(predicate::str::contains("--- page 2 (./page-2.jpg) ---\nHello from Surya\n"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ocr_writes_json_report() {
    let endpoint = serve(
        StatusCode::OK,
        r#"{"text": "a b", "lines": [{"text": "a b", "box": [1, 2, 3, 4]}]}"#,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path());

    let out_dir = dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        surya(&out_dir)
            .env("SURYA_ENDPOINT", &endpoint)
            .args([
                "ocr",
                "--quiet",
                "--first-page",
                "10",
                "--format",
                "json",
                "-o",
                "report.json",
                "page-2.jpg",
                "page-1.jpg",
            ])
            .assert()
            .success();
    })
    .await
    .unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["total_pages"], 2);
    assert_eq!(report["failed_pages"], 0);
    assert_eq!(report["pages"][0]["page"], 10);
    assert_eq!(report["pages"][0]["file"], "page-2.jpg");
    assert_eq!(report["pages"][1]["result"]["lines"][0]["box"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ocr_server_error_exits_non_zero() {
    let endpoint = serve(StatusCode::INTERNAL_SERVER_ERROR, "server error").await;
    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path());

    tokio::task::spawn_blocking(move || {
        surya(dir.path())
            .args(["ocr", "--quiet", "-e", endpoint.as_str(), "page-1.jpg"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("[error]"))
            .stdout(predicate::str::contains("500"))
            .stdout(predicate::str::contains("server error"));
    })
    .await
    .unwrap();
}
