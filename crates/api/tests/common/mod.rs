#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;
use vidreview_api::config::ServerConfig;
use vidreview_api::engine::WorkflowEngine;
use vidreview_api::router::build_app_router;
use vidreview_api::state::AppState;
use vidreview_core::assets::{AssetStore, LocalAssetStore};

/// Build a test `ServerConfig` with safe defaults rooted at `asset_root`.
pub fn test_config(asset_root: &Path) -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        asset_root: asset_root.to_path_buf(),
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

/// Build the full application router over a local asset store at `asset_root`.
pub fn build_test_app(pool: SqlitePool, asset_root: &Path) -> Router {
    let store = Arc::new(LocalAssetStore::new(asset_root));
    build_test_app_with_store(pool, asset_root, store)
}

/// Build the full application router with a caller-supplied asset store.
pub fn build_test_app_with_store(
    pool: SqlitePool,
    asset_root: &Path,
    store: Arc<dyn AssetStore>,
) -> Router {
    let state = AppState {
        engine: WorkflowEngine::new(pool.clone(), store),
        pool,
        config: Arc::new(test_config(asset_root)),
    };
    build_app_router(state)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "PUT", uri, body).await
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a multipart body made of `(field, file_name, bytes)` parts.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    parts: &[(&str, Option<&str>, &[u8])],
) -> Response<Body> {
    const BOUNDARY: &str = "vidreview-test-boundary";
    let mut body = Vec::new();
    for (field, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a project through the API and return its id.
pub async fn create_project(app: Router, brand: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({ "brand_name": brand, "material_price": 99 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// Submit a review through the API and return the response body.
pub async fn submit_review(
    app: Router,
    project_id: &str,
    review_type: &str,
    status: &str,
) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/v1/reviews",
        serde_json::json!({
            "project_id": project_id,
            "review_type": review_type,
            "reviewer_name": "张三",
            "review_status": status,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// A minimal valid PNG header, enough for format detection.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
