//! Smoke tests for the root facade: the re-exported server wiring works
//! end to end.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use taplink::{create_app, AppState, Config, Database};
use tempfile::TempDir;

fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");

    let config = Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        base_url: "http://localhost:0".to_string(),
        max_content_size: 2_000_000,
    };

    let db = Database::new(&config.db_path).expect("open db");
    let state = AppState::new(config, db);
    let app = create_app(state, false);
    let server = TestServer::new(app).expect("server");
    (server, temp_dir)
}

async fn login_token(server: &TestServer) -> String {
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
        .json(&json!({ "email": "ada@example.com", "password": "correct-horse" }))
        .await;
    login.assert_status_ok();
    let body: serde_json::Value = login.json();
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn create_page_register_tag_and_visit() {
    let (server, _temp) = setup_test_server();
    let token = login_token(&server).await;
    let auth = format!("Bearer {}", token);

    let page = server
        .post("/api/pages")
        .add_header("authorization", auth.clone())
        .json(&json!({
            "name": "Welcome",
            "slug": "welcome",
            "content": r##"{"components":[{"type":"HeroSection","title":"Welcome","description":"Scan successful","bgColor":"#FFFFFF"}]}"##,
        }))
        .await;
    page.assert_status_ok();
    let page: serde_json::Value = page.json();
    let page_id = page["id"].as_str().expect("page id").to_string();

    let tag = server
        .post("/api/tags")
        .add_header("authorization", auth.clone())
        .json(&json!({ "name": "Front Desk" }))
        .await;
    tag.assert_status_ok();
    let tag: serde_json::Value = tag.json();
    let tag_id = tag["id"].as_str().expect("tag id").to_string();

    server
        .post("/api/tags/register")
        .add_header("authorization", auth.clone())
        .json(&json!({ "tag_id": tag_id, "tag_uid": "04:aa:bb" }))
        .await
        .assert_status_ok();
    server
        .post("/api/tags/assign")
        .add_header("authorization", auth.clone())
        .json(&json!({ "tag_id": tag_id, "page_id": page_id }))
        .await
        .assert_status_ok();

    let visit = server.get("/t/04:aa:bb").await;
    visit.assert_status_ok();
    assert!(visit.text().contains("Welcome"));

    server
        .get("/t/ff:ff:ff")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_requires_a_session() {
    let (server, _temp) = setup_test_server();
    server
        .get("/api/pages")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
