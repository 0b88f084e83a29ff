// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for the `andaria-feed` binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The binary with an isolated, empty config file and no token in the environment.
fn feed(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("andaria-feed");
    cmd.env_remove("ANDARIA_TOKEN")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(temp.path().join("config.toml"));
    cmd
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    feed(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("read-all"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn missing_token_fails_with_hint() {
    let temp = TempDir::new().unwrap();
    feed(&temp)
        .arg("count")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn invalid_ws_base_is_rejected() {
    let temp = TempDir::new().unwrap();
    feed(&temp)
        .args(["--token", "jwt", "--ws-base", "http://api.test", "count"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ws_base"));
}

#[tokio::test(flavor = "multi_thread")]
async fn count_uses_env_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notificaciones/no-leidas/count"))
        .and(header("authorization", "Bearer jwt-entorno"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"no_leidas": 4}
        })))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    feed(&temp)
        .env("ANDARIA_TOKEN", "jwt-entorno")
        .args(["--api-base", &format!("{}/api/v1", server.uri()), "count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/notificaciones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "notificaciones": [{
                    "id": 3,
                    "tipo": "compra_expirada",
                    "titulo": "Compra expirada",
                    "mensaje": "Tu reserva venció",
                    "datos_json": null,
                    "leida": false,
                    "created_at": "2026-05-03T10:00:00Z"
                }],
                "no_leidas": 1
            }
        })))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let output = feed(&temp)
        .args(["--token", "jwt", "--api-base", &format!("{}/api/v1", server.uri())])
        .args(["list", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["unread"], 1);
    assert_eq!(value["notifications"][0]["tipo"], "compra_expirada");
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/notificaciones/marcar-todas-leidas"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": {"code": "INTERNAL", "message": "Error al actualizar"}
        })))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    feed(&temp)
        .args(["--token", "jwt", "--api-base", &format!("{}/api/v1", server.uri())])
        .arg("read-all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error al actualizar"));
}
