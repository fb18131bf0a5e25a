//! Router-level tests driven through tower's oneshot

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use folio::config::{AdminConfig, Config, DatabaseConfig, ServerConfig, DEFAULT_MAX_IMPORT_BYTES};
use folio::content::database::open_in_memory;
use folio::server::build_router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn config(token: Option<&str>) -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0 },
        database: DatabaseConfig { data_dir: "unused".to_string() },
        admin: AdminConfig {
            token: token.map(str::to_string),
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
        },
    }
}

async fn app(token: Option<&str>) -> Router {
    build_router(open_in_memory().await.unwrap(), &config(token))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_check_answers() {
    let app = app(None).await;
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_endpoints_hide_unpublished_content() {
    let app = app(None).await;

    let (status, about) = send(&app, "POST", "/admin/sections", Some(json!({"name": "About", "slug": "about"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, hidden) = send(&app, "POST", "/admin/sections", Some(json!({"name": "Hidden", "slug": "hidden", "sort_order": 1}))).await;
    send(&app, "POST", &format!("/admin/sections/{}/toggle", hidden["id"]), None).await;

    let about_blocks = format!("/admin/sections/{}/blocks", about["id"]);
    let (status, _) = send(&app, "POST", &about_blocks, Some(json!({"title": "Shown", "layout": "text-center"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    send(&app, "POST", &about_blocks, Some(json!({"title": "Draft", "is_published": false}))).await;

    send(&app, "POST", "/admin/projects", Some(json!({"title": "Live", "tags": "Rust"}))).await;
    send(&app, "POST", "/admin/projects", Some(json!({"title": "Draft", "is_published": false}))).await;

    let (status, sections) = send(&app, "GET", "/api/sections", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        sections,
        json!([{
            "name": "About",
            "slug": "about",
            "blocks": [{
                "title": "Shown", "subtitle": "", "body": "", "image": "", "icon": "",
                "button_text": "", "button_url": "", "layout": "text-center"
            }]
        }])
    );

    let (_, projects) = send(&app, "GET", "/api/projects", None).await;
    assert_eq!(projects.as_array().unwrap().len(), 1);
    assert_eq!(projects[0]["title"], "Live");
    assert!(projects[0].get("id").is_none());
}

#[tokio::test]
async fn admin_errors_map_to_statuses() {
    let app = app(None).await;

    send(&app, "POST", "/admin/sections", Some(json!({"name": "About", "slug": "about"}))).await;
    let (status, body) = send(&app, "POST", "/admin/sections", Some(json!({"name": "Again", "slug": "about"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Slug already in use: about");

    let (status, _) = send(&app, "POST", "/admin/sections", Some(json!({"name": " ", "slug": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/admin/sections/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/admin/sections/999/blocks", Some(json!({"title": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/admin/projects/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/admin/settings", Some(json!({"password": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_form_round_trip() {
    let app = app(None).await;

    let (status, settings) = send(&app, "PUT", "/admin/settings", Some(json!({"site_name": "Folio"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["site_name"], "Folio");
    assert_eq!(settings["email"], "");

    let (status, settings) = send(&app, "PUT", "/admin/settings", Some(json!({"email": "me@example.com"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["site_name"], "Folio");
    assert_eq!(settings["email"], "me@example.com");

    let (status, body) = send(&app, "PUT", "/admin/settings", Some(json!({"favicon": "x.ico"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown setting: favicon");

    let (_, theme) = send(&app, "GET", "/api/settings/theme_primary", None).await;
    assert_eq!(theme, json!({"key": "theme_primary", "value": "#0ea5e9"}));
}

#[tokio::test]
async fn export_then_import_over_http() {
    let app = app(None).await;
    let (_, about) = send(&app, "POST", "/admin/sections", Some(json!({"name": "About", "slug": "about"}))).await;
    send(&app, "POST", &format!("/admin/sections/{}/blocks", about["id"]), Some(json!({"title": "X"}))).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/admin/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"portfolio-export-"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut document: Value = serde_json::from_slice(&bytes).unwrap();

    document["sections"][0]["blocks"][0]["title"] = "Y".into();
    let (status, report) = send(&app, "POST", "/admin/import", Some(document)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["sections_created"], 1);

    let (_, sections) = send(&app, "GET", "/api/sections", None).await;
    assert_eq!(sections[0]["blocks"][0]["title"], "Y");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/import")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, stats) = send(&app, "GET", "/admin/stats", None).await;
    assert_eq!(stats, json!({"sections": 1, "blocks": 1, "projects": 0}));
}

#[tokio::test]
async fn admin_token_is_enforced() {
    let app = app(Some("s3cret")).await;

    let (status, _) = send(&app, "GET", "/admin/stats", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .header(header::AUTHORIZATION, "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/sections", None).await;
    assert_eq!(status, StatusCode::OK);
}
