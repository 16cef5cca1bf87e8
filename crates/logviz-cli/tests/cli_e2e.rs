#![allow(deprecated)]
//! End-to-end runs of the `logviz` binary against a mocked query endpoint.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_page_body() -> Value {
    json!({
        "data": {
            "sample_page": {
                "run_id": "run-1",
                "sample_id": "match.dev.1",
                "sample_metrics": {"data": "{'correct': false, 'expected': '<b>Rome</b>'}"},
                "sampling_events": [
                    {
                        "event_id": 3,
                        "data": {
                            "prompt": [
                                {"role": "system", "content": "Answer with one word.", "name": null},
                                {"role": "user", "content": "Capital of Italy?", "name": null}
                            ],
                            "sampled": ["Milan"]
                        }
                    },
                    {"event_id": 4, "data": {"prompt": [], "sampled": "ok"}}
                ]
            },
            "metadata": {"num_samples": 5}
        }
    })
}

async fn mount(server: &MockServer, operation: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"operationName": operation})))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn logviz(args: Vec<String>) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("logviz")
            .unwrap()
            .env_remove("LOGVIZ_URL")
            .env_remove("LOGVIZ_TIMEOUT")
            .args(&args)
            .assert()
    })
    .await
    .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut out = vec!["--url".to_string(), format!("{}/graphql", server.uri())];
    out.extend(rest.iter().map(|s| s.to_string()));
    out
}

#[tokio::test(flavor = "multi_thread")]
async fn page_renders_text() {
    let server = MockServer::start().await;
    mount(&server, "SamplePage", 200, sample_page_body()).await;

    logviz(args(
        &server,
        &["page", "--run-id", "run-1", "--page", "2", "--expand", "3"],
    ))
    .await
    .success()
    .stdout(predicate::str::contains("Page 2 of 5 | prev: 1 | next: 3"))
    .stdout(predicate::str::contains("Sample ID: match.dev.1"))
    .stdout(predicate::str::contains("▾ Event ID: 3"))
    .stdout(predicate::str::contains("▸ Event ID: 4 (1 rows)"))
    .stdout(predicate::str::contains("correct: false"));
}

#[tokio::test(flavor = "multi_thread")]
async fn page_writes_html_file() {
    let server = MockServer::start().await;
    mount(&server, "SamplePage", 200, sample_page_body()).await;
    let dir = tempdir().unwrap();
    let out = dir.path().join("page.html");

    logviz(args(
        &server,
        &[
            "page",
            "--run-id",
            "run-1",
            "--format",
            "html",
            "--expand-all",
            "--out",
            out.to_str().unwrap(),
        ],
    ))
    .await
    .success()
    .stdout(predicate::str::is_empty());

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("data-event-id=\"3\" open>"));
    assert!(html.contains("&lt;b&gt;Rome&lt;/b&gt;"));
    assert!(!html.contains("<b>Rome</b>"));
    assert!(html.contains("aria-disabled=\"true\">Previous</span>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_page_exits_not_found() {
    let server = MockServer::start().await;
    mount(
        &server,
        "SamplePage",
        200,
        json!({
            "data": {"sample_page": null, "metadata": {"num_samples": 5}},
            "errors": [{"message": "list index out of range"}]
        }),
    )
    .await;

    logviz(args(&server, &["page", "--run-id", "run-1", "--page", "9"]))
        .await
        .code(1)
        .stderr(predicate::str::contains(
            "Page not found for run_id 'run-1' and page_id '9'",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn view_survives_failed_report() {
    let server = MockServer::start().await;
    mount(&server, "SamplePage", 200, sample_page_body()).await;
    mount(&server, "FinalReport", 502, json!({"error": "bad gateway"})).await;
    mount(&server, "Spec", 200, json!({"data": {"spec": null}})).await;

    logviz(args(&server, &["view", "--run-id", "run-1"]))
        .await
        .success()
        .stdout(predicate::str::contains("== Final Report ==\n(loading)"))
        .stdout(predicate::str::contains("Spec not found for run_id 'run-1'"))
        .stdout(predicate::str::contains("Event ID: 3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn runs_as_json() {
    let server = MockServer::start().await;
    mount(
        &server,
        "MetadataList",
        200,
        json!({
            "data": {"metadata_list": [
                {"run_id": "run-1", "name": "nightly", "num_samples": 5, "eval_name": "match.dev"},
                {"run_id": null, "num_samples": 0}
            ]}
        }),
    )
    .await;

    let assert = logviz(args(&server, &["runs", "--format", "json"]))
        .await
        .success();
    let out: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let runs = out["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["run_id"], "run-1");
    assert_eq!(runs[0]["samples"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn query_errors_exit_invalid_response() {
    let server = MockServer::start().await;
    mount(
        &server,
        "FinalReport",
        200,
        json!({"errors": [{"message": "Cannot query field 'final_report'"}]}),
    )
    .await;

    logviz(args(&server, &["report", "--run-id", "run-1"]))
        .await
        .code(4)
        .stderr(predicate::str::contains("Cannot query field"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_endpoint_exits_transport_error() {
    logviz(
        [
            "--url",
            "http://127.0.0.1:1/graphql",
            "--timeout",
            "2",
            "page",
            "--run-id",
            "run-1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
    .await
    .code(3);
}

#[test]
fn unsupported_url_scheme_exits_config_error() {
    Command::cargo_bin("logviz")
        .unwrap()
        .args(["--url", "ftp://example.com/graphql", "spec", "--run-id", "r"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal"));
}

#[test]
fn page_zero_is_a_usage_error() {
    Command::cargo_bin("logviz")
        .unwrap()
        .args(["page", "--run-id", "r", "--page", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("pages are numbered from 1"));
}

#[test]
fn version_prints_package_version() {
    Command::cargo_bin("logviz")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
