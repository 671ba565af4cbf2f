/*
[INPUT]:  Mock server and tracked process ids
[OUTPUT]: Orchestrator fixtures and canned server responses
[POS]:    Test infrastructure - shared across app integration tests
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for wfe-mobile-app tests

#![allow(dead_code)]

use serde_json::{Value, json};
use wfe_mobile_adapter::{ClientConfig, WfeClient};
use wfe_mobile_app::App;
use wfe_mobile_app::config::{AppConfig, MyTasksConfig, ServerConfig, TrackedProcessConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const LOGIN: &str = "anna";
pub const PASSWORD: &str = "secret";
pub const DISPLAY_NAME: &str = "Anna Petrova";

pub fn config_for(server: &MockServer, ids: &[i64]) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            base_url: server.uri(),
            ..ServerConfig::default()
        },
        tracked_processes: ids
            .iter()
            .map(|&id| TrackedProcessConfig { id, label: None })
            .collect(),
        my_tasks: MyTasksConfig::default(),
    }
}

/// Orchestrator talking to the mock server
pub fn app_for(server: &MockServer, ids: &[i64]) -> App {
    let client = WfeClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init");
    App::with_client(config_for(server, ids), client)
}

pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/basic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "test-token",
            "user": {"name": LOGIN, "fullName": DISPLAY_NAME}
        })))
        .mount(server)
        .await;
}

/// Ended processes also carry `endDate`
pub fn process_json(id: i64, status: &str) -> Value {
    let mut process = json!({
        "id": id,
        "definitionName": format!("Process {id}"),
        "executionStatus": status,
        "startDate": "2023-12-31T09:30:00Z"
    });
    if status == "ENDED" {
        process["endDate"] = json!("2024-01-01T10:00:00Z");
    }
    process
}

pub async fn mount_process(server: &MockServer, id: i64, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/process/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(process_json(id, status)))
        .mount(server)
        .await;
}

pub fn task_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "owner": {"fullName": DISPLAY_NAME},
        "state": "ASSIGNED"
    })
}

/// `METHOD /path` of every request the server has seen, in arrival order
pub async fn request_log(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(describe)
        .collect()
}

fn describe(request: &Request) -> String {
    format!("{} {}", request.method, request.url.path())
}
