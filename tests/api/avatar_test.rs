//! Avatar upload and download tests

use crate::common::*;
use axum::body::to_bytes;
use axum::http::header;

async fn fetch_avatar(app: &TestApp, id: i64) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/getAvatar/ID={}", id)))
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_node_without_upload_serves_default() {
    let app = test_app().await;

    let (status, content_type, bytes) = fetch_avatar(&app, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, DEFAULT_AVATAR_BYTES);
}

#[tokio::test]
async fn test_upload_then_download() {
    let app = test_app().await;
    let gif = b"GIF89a-test";

    let (status, tree) = app
        .send(multipart_add_request(
            r#"{"ParentID":1,"Title":"Pic"}"#,
            Some((gif.as_slice(), "image/gif")),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = find_id(&tree, "Pic").unwrap();

    let (status, content_type, bytes) = fetch_avatar(&app, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/gif"));
    assert_eq!(bytes, gif);

    let stored = app.service.get_node(id).unwrap().attachment.unwrap();
    assert!(stored.starts_with("avatar-"));
    assert!(app.avatars_dir.path().join(stored).exists());
}

#[tokio::test]
async fn test_upload_non_image_rejected() {
    let app = test_app().await;

    let (status, json) = app
        .send(multipart_add_request(
            r#"{"ParentID":1,"Title":"Doc"}"#,
            Some((b"hello".as_slice(), "text/plain")),
        ))
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["code"], "UNSUPPORTED_CONTENT_TYPE");
    assert_eq!(app.service.verify().unwrap(), 1);
}

#[tokio::test]
async fn test_upload_too_large_rejected() {
    let app = test_app().await;
    let big = vec![0u8; 2048];

    let (status, _) = app
        .send(multipart_add_request(
            r#"{"ParentID":1,"Title":"Big"}"#,
            Some((big.as_slice(), "image/png")),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.service.verify().unwrap(), 1);
}

#[tokio::test]
async fn test_upload_removed_when_insert_fails() {
    let app = test_app().await;

    let (status, _) = app
        .send(multipart_add_request(
            r#"{"ParentID":404,"Title":"Lost"}"#,
            Some((b"\x89PNG".as_slice(), "image/png")),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let leftovers: Vec<_> = std::fs::read_dir(app.avatars_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("avatar-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_avatar_of_missing_node() {
    let app = test_app().await;
    let (status, _, _) = fetch_avatar(&app, 55).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_avatar_malformed_selector() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(get("/getAvatar/NAME=x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
