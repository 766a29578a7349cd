//! Nested-set scenarios shared by every backend

use nested_tree_server::config::TreeConfig;
use nested_tree_server::storage::MemoryStore;
use nested_tree_server::tree::{AssemblyMode, TreeAssembler};
use nested_tree_server::{NewNode, ServerError, SqliteStore, TreeService, TreeStore};
use std::sync::Arc;

fn sqlite() -> Arc<dyn TreeStore> {
    let store = SqliteStore::in_memory().expect("Failed to create in-memory storage");
    store.initialize().expect("Failed to initialize storage");
    Arc::new(store)
}

fn memory() -> Arc<dyn TreeStore> {
    Arc::new(MemoryStore::new("ROOT"))
}

fn backends() -> Vec<(&'static str, Arc<dyn TreeStore>)> {
    vec![("sqlite", sqlite()), ("memory", memory())]
}

fn bounds(store: &dyn TreeStore, id: i64) -> (i64, i64) {
    let node = store.get_node(id).unwrap();
    (node.lft, node.rgt)
}

#[test]
fn test_insert_delete_scenario() {
    for (name, store) in backends() {
        assert_eq!(bounds(store.as_ref(), 1), (1, 2), "{}", name);

        let a = store.insert(NewNode::new(1, "A")).unwrap();
        assert_eq!(bounds(store.as_ref(), 1), (1, 4), "{}", name);
        assert_eq!(bounds(store.as_ref(), a), (2, 3), "{}", name);

        let b = store.insert(NewNode::new(1, "B")).unwrap();
        assert_eq!(bounds(store.as_ref(), 1), (1, 6), "{}", name);
        assert_eq!(bounds(store.as_ref(), b), (4, 5), "{}", name);

        store.delete(a).unwrap();
        assert_eq!(bounds(store.as_ref(), 1), (1, 4), "{}", name);
        assert_eq!(bounds(store.as_ref(), b), (2, 3), "{}", name);
        assert_eq!(store.node_count().unwrap(), 2, "{}", name);
    }
}

#[test]
fn test_deep_subtree_delete() {
    for (name, store) in backends() {
        let a = store.insert(NewNode::new(1, "A")).unwrap();
        let b = store.insert(NewNode::new(a, "B")).unwrap();
        let c = store.insert(NewNode::new(b, "C")).unwrap();
        let d = store.insert(NewNode::new(1, "D")).unwrap();
        assert_eq!(bounds(store.as_ref(), d), (8, 9), "{}", name);

        store.delete(a).unwrap();

        for gone in [a, b, c] {
            assert!(
                matches!(store.get_node(gone), Err(ServerError::NodeNotFound(_))),
                "{}",
                name
            );
        }
        assert_eq!(bounds(store.as_ref(), d), (2, 3), "{}", name);
        assert_eq!(bounds(store.as_ref(), 1), (1, 4), "{}", name);
    }
}

#[test]
fn test_delete_middle_sibling() {
    for (name, store) in backends() {
        let a = store.insert(NewNode::new(1, "A")).unwrap();
        let b = store.insert(NewNode::new(1, "B")).unwrap();
        let c = store.insert(NewNode::new(1, "C")).unwrap();
        store.insert(NewNode::new(b, "B1")).unwrap();

        store.delete(b).unwrap();

        assert_eq!(bounds(store.as_ref(), a), (2, 3), "{}", name);
        assert_eq!(bounds(store.as_ref(), c), (4, 5), "{}", name);
        let root = store.get_root().unwrap();
        let children: Vec<i64> = store.children(&root).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(children, vec![a, c], "{}", name);
    }
}

#[test]
fn test_root_and_missing_errors_leave_tree_intact() {
    for (name, store) in backends() {
        store.insert(NewNode::new(1, "A")).unwrap();
        let before = store.snapshot().unwrap();

        assert!(matches!(store.delete(1), Err(ServerError::InvalidOperation(_))), "{}", name);
        assert!(matches!(store.delete(404), Err(ServerError::NodeNotFound(_))), "{}", name);
        assert!(
            matches!(store.insert(NewNode::new(404, "X")), Err(ServerError::NodeNotFound(_))),
            "{}",
            name
        );

        assert_eq!(store.snapshot().unwrap(), before, "{}", name);
    }
}

#[test]
fn test_assembly_modes_agree_on_both_backends() {
    for (name, store) in backends() {
        let a = store.insert(NewNode::new(1, "A")).unwrap();
        let b = store.insert(NewNode::new(1, "B")).unwrap();
        store.insert(NewNode::new(a, "C")).unwrap();
        store.insert(NewNode::new(b, "D")).unwrap();
        store.insert(NewNode::new(a, "E")).unwrap();

        let by_descendants = TreeAssembler::new(AssemblyMode::Descendants)
            .build(store.as_ref())
            .unwrap();
        let by_snapshot = TreeAssembler::new(AssemblyMode::Snapshot)
            .build(store.as_ref())
            .unwrap();

        assert_eq!(by_descendants, by_snapshot, "{}", name);
        assert_eq!(by_descendants.len(), 6, "{}", name);
        let a_children: Vec<&str> = by_descendants.child_nodes[0]
            .child_nodes
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(a_children, vec!["C", "E"], "{}", name);
    }
}

#[test]
fn test_backends_build_identical_trees() {
    let sqlite = TreeService::new(sqlite(), &TreeConfig::default());
    let memory = TreeService::new(memory(), &TreeConfig::default());

    for service in [&sqlite, &memory] {
        let a = service.insert(1, "A", None).unwrap();
        service.insert(a, "A", None).unwrap();
        let b = service.insert(1, "B", None).unwrap();
        service.delete(a).unwrap();
        service.insert(b, "C", None).unwrap();
    }

    assert_eq!(sqlite.get_tree().unwrap(), memory.get_tree().unwrap());
    assert_eq!(sqlite.verify().unwrap(), memory.verify().unwrap());
}
