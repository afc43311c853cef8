//! End-to-end tests for the HTTP endpoints over a real socket.

use reqwest::StatusCode;
use swiss_army_knife::config::Mode;
use swiss_army_knife::lifecycle::DrainOutcome;

mod common;

#[tokio::test]
async fn test_echo_mirrors_post_request() {
    let server = common::start_server(Mode::Echo).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(server.url("/?debug=1&debug=2"))
        .header("X-Test", "v")
        .body(r#"{"a":1}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/json");

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["request"]["method"], "POST");
    assert_eq!(json["request"]["path"], "/");
    assert_eq!(json["request"]["body"], r#"{"a":1}"#);
    assert_eq!(json["request"]["headers"]["X-Test"], serde_json::json!(["v"]));
    assert_eq!(json["request"]["query"]["debug"], serde_json::json!(["1", "2"]));

    let remote = json["request"]["remoteAddress"].as_str().unwrap();
    assert!(remote.starts_with("127.0.0.1:"), "unexpected remote {remote}");
    assert!(!json["hostname"].as_str().unwrap().is_empty());

    server.shutdown.trigger();
    assert_eq!(server.handle.await.unwrap().unwrap(), DrainOutcome::Clean);
}

#[tokio::test]
async fn test_echo_answers_any_method() {
    let server = common::start_server(Mode::Echo).await;
    let client = reqwest::Client::new();

    for method in [reqwest::Method::PUT, reqwest::Method::DELETE, reqwest::Method::PATCH] {
        let resp = client
            .request(method.clone(), server.url("/"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["request"]["method"], method.as_str());
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_healthz_in_both_modes() {
    for mode in [Mode::Dashboard, Mode::Echo] {
        let server = common::start_server(mode).await;
        let resp = reqwest::get(server.url("/healthz")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "ok");
        server.shutdown.trigger();
    }
}

#[tokio::test]
async fn test_version_document() {
    let server = common::start_server(Mode::Dashboard).await;
    let resp = reqwest::get(server.url("/version")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert!(keys.contains(&"version"));
    assert!(keys.contains(&"gitCommit"));
    assert!(keys.contains(&"buildTime"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_dashboard_prefers_forwarded_for() {
    let server = common::start_server(Mode::Dashboard).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(server.url("/"))
        .header("X-Forwarded-For", "203.0.113.9")
        .header("X-Real-IP", "198.51.100.7")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<td>203.0.113.9</td>"));
    assert!(html.contains("<footer>version "));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_dashboard_escapes_header_values() {
    let server = common::start_server(Mode::Dashboard).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(server.url("/"))
        .header("X-Evil", "<script>alert(1)</script>")
        .send()
        .await
        .unwrap();

    let html = resp.text().await.unwrap();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("<td>X-Evil</td><td>&#60;script&#62;alert(1)&#60;/script&#62;</td>"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_dashboard_falls_back_to_socket_address() {
    let server = common::start_server(Mode::Dashboard).await;
    let html = reqwest::get(server.url("/")).await.unwrap().text().await.unwrap();

    assert!(html.contains("<td>127.0.0.1:"));

    server.shutdown.trigger();
}
