//! Integration tests for the treetag-web HTTP surface
//!
//! These run against a router whose remote credentials are all absent and
//! whose store URL points at a reserved port, so every assertion here must
//! hold without contacting any remote service: shells render, health
//! responds, and requests missing required fields are rejected with 400
//! before any side effect.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`
use treetag_common::config::Config;
use treetag_web::{build_router, AppState};

fn test_config() -> Config {
    Config {
        bind: "127.0.0.1:0".into(),
        // TEST-NET address; any accidental remote call fails fast
        store_url: "http://192.0.2.1:9".into(),
        store_auth: None,
        public_base_url: "http://127.0.0.1:8080".into(),
        media: None,
        ai_key: None,
        ai_url: "http://192.0.2.1:9".into(),
        plant_id_key: None,
        identity_key: None,
        smtp: None,
    }
}

fn setup_app() -> axum::Router {
    let state = AppState::new(test_config()).expect("state should build");
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("should read body");
    serde_json::from_slice(&bytes).expect("should parse JSON")
}

#[tokio::test]
async fn health_endpoint_reports_module_and_version() {
    let app = setup_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "treetag-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn html_shells_are_served() {
    for uri in [
        "/",
        "/home",
        "/drafts",
        "/qr-display",
        "/library",
        "/settings",
        "/head_dashboard",
        "/generate",
        "/data_entry",
        "/classification",
        "/location",
        "/image",
        "/identify",
        "/signin",
        "/signup",
        "/get-event",
        "/admin",
        "/admin/dashboard",
        "/admin/edit/some-uid",
    ] {
        let app = setup_app();
        let response = app.oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"), "GET {uri}: {content_type}");
    }
}

#[tokio::test]
async fn generate_form_requires_tree_name() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/generate", "treeName=&volunteerName=v%40example.org"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn generate_form_requires_volunteer() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/generate", "treeName=Neem"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_json_requires_name_and_uid() {
    let app = setup_app();
    let response = app
        .oneshot(post_json("/generate", r#"{"name":"","uid":"u1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = setup_app();
    let response = app
        .oneshot(post_json("/generate", r#"{"name":"Neem","uid":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn publish_requires_uid() {
    let app = setup_app();
    let response = app.oneshot(post_form("/publish", "uid=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn data_entry_requires_record_key() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/data_entry", "name=Neem"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classification_requires_record_key() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/classification", "kingdom=Plantae"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn location_requires_record_key() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/location", "city=Pune"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_requires_record_key() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/delete", "email=v%40example.org"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_image_requires_uid_and_url() {
    let app = setup_app();
    let response = app
        .oneshot(post_json("/delete-image", r#"{"uid":"","url":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn signup_rejects_password_mismatch() {
    let app = setup_app();
    let response = app
        .oneshot(post_form(
            "/signup",
            "email=v%40example.org&password=abc12345&confirm_password=different",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn signup_requires_all_fields() {
    let app = setup_app();
    let response = app
        .oneshot(post_form("/signup", "email=v%40example.org"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_requires_credentials() {
    let app = setup_app();
    let response = app.oneshot(post_form("/signin", "email=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn change_password_requires_all_fields() {
    let app = setup_app();
    let response = app
        .oneshot(post_json(
            "/change-password",
            r#"{"email":"v@example.org","currentPassword":"","newPassword":"x"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_require_email_parameter() {
    for uri in ["/api/drafts", "/api/published", "/api/treecount"] {
        let app = setup_app();
        let response = app.oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "GET {uri}");
    }
}

#[tokio::test]
async fn pdf_download_requires_id_and_name() {
    let app = setup_app();
    let response = app.oneshot(get("/download-pdf?id=u1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_role_requires_uid_and_role() {
    let app = setup_app();
    let response = app
        .oneshot(post_json("/api/updateRole?uid=", r#"{"role":"head"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = setup_app();
    let response = app
        .oneshot(post_json("/api/updateRole?uid=u1", r#"{"role":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_requires_email() {
    let app = setup_app();
    let response = app
        .oneshot(post_json("/head/approve", r#"{"email":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn revoke_requires_email() {
    let app = setup_app();
    let response = app.oneshot(get("/revoke_volunteer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_login_requires_credentials() {
    let app = setup_app();
    let response = app
        .oneshot(post_json("/admin", r#"{"email":"a@example.org","password":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = setup_app();
    let response = app.oneshot(get("/no-such-route")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
