//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use serde_json::json;
use std::path::Path;
use taplink_server::{create_app, AppState, Config, Database};
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        base_url: "http://localhost:0".to_string(),
        max_content_size: 2_000_000,
    }
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = test_config_for_db_path(&db_path);
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let app = create_app(state, false);
    let server = TestServer::new(app).expect("server");
    (server, temp_dir)
}

/// Register a default editor account and log in, returning the bearer token.
pub(crate) async fn register_and_login(server: &TestServer) -> String {
    server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "correct-horse",
        }))
        .await
        .assert_status_ok();

    let login = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse",
        }))
        .await;
    login.assert_status_ok();
    let body: serde_json::Value = login.json();
    body["token"].as_str().expect("token").to_string()
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
