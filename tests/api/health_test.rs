//! Health endpoint tests

use crate::common::*;

#[tokio::test]
async fn test_health_on_fresh_store() {
    let app = test_app().await;

    let (status, json) = app.send(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["nodes"], 1);
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_health_counts_nodes_after_mutations() {
    let app = test_app().await;
    app.add(1, "A").await;
    let tree = app.add(1, "B").await;
    app.add(find_id(&tree, "A").unwrap(), "C").await;
    app.delete(find_id(&tree, "B").unwrap()).await;

    let (status, json) = app.send(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nodes"], 3);
}
