//! Custom test assertions for tree JSON

use serde_json::Value;

/// Assert that every node carries exactly `ID`, `Title` and an array `ChildNodes`
pub fn assert_valid_tree_structure(node: &Value) {
    let object = node.as_object().expect("Tree node should be a JSON object");
    assert_eq!(object.len(), 3, "Unexpected fields in {}", node);
    assert!(node["ID"].is_i64(), "ID should be an integer: {}", node);
    assert!(node["Title"].is_string(), "Title should be a string: {}", node);

    let children = node["ChildNodes"]
        .as_array()
        .expect("ChildNodes should be an array");
    for child in children {
        assert_valid_tree_structure(child);
    }
}

/// Titles in pre-order (parent before children, left to right)
pub fn preorder_titles(node: &Value) -> Vec<String> {
    let mut titles = vec![node["Title"].as_str().unwrap_or_default().to_string()];
    if let Some(children) = node["ChildNodes"].as_array() {
        for child in children {
            titles.extend(preorder_titles(child));
        }
    }
    titles
}

/// Titles of the immediate children
pub fn child_titles(node: &Value) -> Vec<String> {
    node["ChildNodes"]
        .as_array()
        .map(|children| {
            children
                .iter()
                .map(|c| c["Title"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Id of the first node (pre-order) titled `title`
pub fn find_id(node: &Value, title: &str) -> Option<i64> {
    if node["Title"] == title {
        return node["ID"].as_i64();
    }
    node["ChildNodes"]
        .as_array()?
        .iter()
        .find_map(|child| find_id(child, title))
}
