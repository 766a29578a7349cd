//! Test fixtures and app setup utilities

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use nested_tree_server::api::{create_router, AppState};
use nested_tree_server::config::{AvatarConfig, TreeConfig};
use nested_tree_server::storage::AvatarStore;
use nested_tree_server::{LocalTreeClient, SqliteStore, TreeService};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "----nested-tree-boundary";

/// Bytes of the default avatar written into every test avatars dir
pub const DEFAULT_AVATAR_BYTES: &[u8] = b"\x89PNG\r\n\x1a\ndefault";

/// A running app plus the directory its avatars live in
pub struct TestApp {
    pub router: Router,
    pub service: Arc<TreeService>,
    pub avatars_dir: TempDir,
}

impl TestApp {
    /// Send a request and decode the JSON body (Null for non-JSON bodies)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn get_tree(&self) -> Value {
        let (status, json) = self.send(get("/getTree")).await;
        assert_eq!(status, StatusCode::OK);
        json
    }

    /// Add a node through the JSON body variant, returning the new tree
    pub async fn add(&self, parent_id: i64, title: &str) -> Value {
        let (status, json) = self.send(json_add_request(parent_id, title)).await;
        assert_eq!(status, StatusCode::OK, "addNode failed: {}", json);
        json
    }

    pub async fn delete(&self, id: i64) -> (StatusCode, Value) {
        self.send(get(&format!("/deleteNode/ID={}", id))).await
    }
}

/// Test app over in-memory SQLite with default tree settings
pub async fn test_app() -> TestApp {
    test_app_with(TreeConfig::default()).await
}

/// Test app with custom tree settings
pub async fn test_app_with(tree: TreeConfig) -> TestApp {
    let storage = SqliteStore::in_memory().expect("Failed to create in-memory storage");
    storage.initialize().expect("Failed to initialize storage");

    let service = Arc::new(TreeService::new(Arc::new(storage), &tree));

    let avatars_dir = tempfile::tempdir().expect("Failed to create avatars dir");
    let avatars = AvatarConfig {
        dir: avatars_dir.path().to_path_buf(),
        max_upload_bytes: 1024,
        ..AvatarConfig::default()
    };
    std::fs::write(avatars_dir.path().join(&avatars.default_file), DEFAULT_AVATAR_BYTES)
        .expect("Failed to write default avatar");

    let state = Arc::new(AppState {
        client: Arc::new(LocalTreeClient::new(service.clone())),
        avatars: AvatarStore::new(avatars),
        max_title_len: tree.max_title_len,
        cors_origins: vec![],
    });

    TestApp {
        router: create_router(state),
        service,
        avatars_dir,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn json_add_request(parent_id: i64, title: &str) -> Request<Body> {
    let body = serde_json::json!({ "ParentID": parent_id, "Title": title });
    Request::post("/addNode")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build the multipart form POST /addNode expects
///
/// `upload` is `(bytes, content type)`; `filestatus` is "true" only when it is given.
pub fn multipart_add_request(json_data: &str, upload: Option<(&[u8], &str)>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    push_text_part(&mut body, "jsonData", json_data);
    push_text_part(
        &mut body,
        "filestatus",
        if upload.is_some() { "true" } else { "false" },
    );

    if let Some((bytes, content_type)) = upload {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"uploadfile\"; filename=\"avatar\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/addNode")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn push_text_part(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}
