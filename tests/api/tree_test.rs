//! Tree endpoint tests

use crate::common::*;
use serde_json::json;

#[tokio::test]
async fn test_fresh_tree_is_lone_root() {
    let app = test_app().await;

    let tree = app.get_tree().await;

    assert_valid_tree_structure(&tree);
    assert_eq!(tree, json!({ "ID": 1, "Title": "ROOT", "ChildNodes": [] }));
}

#[tokio::test]
async fn test_tree_preserves_child_order() {
    let app = test_app().await;
    app.add(1, "A").await;
    app.add(1, "B").await;
    let tree = app.add(1, "C").await;

    assert_eq!(child_titles(&tree), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_nested_tree_shape() {
    let app = test_app().await;
    app.add(1, "A").await;
    app.add(1, "B").await;
    let tree = app.get_tree().await;
    let a = find_id(&tree, "A").unwrap();
    let b = find_id(&tree, "B").unwrap();

    app.add(a, "C").await;
    app.add(b, "D").await;
    let tree = app.get_tree().await;
    let c = find_id(&tree, "C").unwrap();
    let tree = app.add(c, "E").await;

    assert_valid_tree_structure(&tree);
    assert_eq!(preorder_titles(&tree), vec!["ROOT", "A", "C", "E", "B", "D"]);
    assert_eq!(
        tree["ChildNodes"][0]["ChildNodes"][0]["ChildNodes"][0]["Title"],
        "E"
    );
}

#[tokio::test]
async fn test_get_tree_is_repeatable() {
    let app = test_app().await;
    app.add(1, "A").await;

    let first = app.get_tree().await;
    let second = app.get_tree().await;
    assert_eq!(first, second);
}
