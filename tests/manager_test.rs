//! Mutation tests for TreeManager: add, remove, move, expand/collapse, rebuild, clear

use rstest::{fixture, rstest};

use systree::domain::{DomainError, NodeKind, TreeManager, ROOT_ID};

#[fixture]
fn manager() -> TreeManager {
    systree::util::testing::init_test_setup();
    TreeManager::new()
}

fn child_ids(manager: &TreeManager, id: &str) -> Vec<String> {
    manager
        .children(id)
        .unwrap()
        .iter()
        .map(|n| n.id.clone())
        .collect()
}

// ============================================================
// Add
// ============================================================

#[rstest]
fn given_parent_when_adding_child_then_appends_last_with_generated_id(mut manager: TreeManager) {
    let id = manager
        .add_child("processes", "postgres", NodeKind::Process)
        .unwrap();

    assert!(id.starts_with("process-"));
    assert_eq!(id.len(), "process-".len() + 8);
    assert_eq!(child_ids(&manager, "processes").last(), Some(&id));
    assert_eq!(manager.total_count(), 36);
    assert_eq!(manager.node(&id).unwrap().name, "postgres");
    assert_eq!(manager.node_depth(&id).unwrap(), 2);
}

#[rstest]
fn given_collapsed_parent_when_adding_child_then_parent_is_expanded(mut manager: TreeManager) {
    assert!(!manager.node("network").unwrap().expanded);
    manager
        .add_child("network", "docker0", NodeKind::NetworkInterface)
        .unwrap();
    assert!(manager.node("network").unwrap().expanded);
}

#[rstest]
fn given_explicit_id_when_adding_then_uses_it(mut manager: TreeManager) {
    let id = manager
        .add_child_with_id("users", "user-bob", "bob", NodeKind::User)
        .unwrap();
    assert_eq!(id, "user-bob");
    assert!(manager.contains("user-bob"));
}

#[rstest]
fn given_existing_id_when_adding_then_rejects_duplicate(mut manager: TreeManager) {
    let err = manager
        .add_child_with_id("users", "user-alice", "alice2", NodeKind::User)
        .unwrap_err();
    assert_eq!(err, DomainError::DuplicateId("user-alice".into()));
    assert_eq!(manager.total_count(), 35);
}

#[rstest]
fn given_unknown_parent_when_adding_then_fails(mut manager: TreeManager) {
    let err = manager
        .add_child("nowhere", "ghost", NodeKind::File)
        .unwrap_err();
    assert_eq!(err, DomainError::NodeNotFound("nowhere".into()));
    assert_eq!(manager.total_count(), 35);
}

#[rstest]
#[case("")]
#[case("   ")]
fn given_blank_name_when_adding_then_fails(mut manager: TreeManager, #[case] name: &str) {
    let err = manager.add_child("users", name, NodeKind::User).unwrap_err();
    assert!(matches!(err, DomainError::InvalidName(_)));
}

// ============================================================
// Remove
// ============================================================

#[rstest]
fn given_branch_when_removing_then_drops_whole_subtree(mut manager: TreeManager) {
    let removed = manager.remove("proc-init").unwrap();

    assert_eq!(removed, 4);
    assert_eq!(manager.total_count(), 31);
    for gone in ["proc-init", "proc-sshd", "proc-bash", "proc-cron"] {
        assert!(manager.node(gone).is_none(), "{} should be gone", gone);
    }
    assert_eq!(child_ids(&manager, "processes"), vec!["proc-kthreadd"]);
}

#[rstest]
fn given_root_when_removing_then_fails(mut manager: TreeManager) {
    assert_eq!(manager.remove(ROOT_ID).unwrap_err(), DomainError::RootRemoval);
    assert_eq!(manager.total_count(), 35);
}

#[rstest]
fn given_unknown_id_when_removing_then_fails(mut manager: TreeManager) {
    assert!(matches!(
        manager.remove("missing").unwrap_err(),
        DomainError::NodeNotFound(_)
    ));
}

#[rstest]
fn given_removed_id_when_adding_again_then_id_is_reusable(mut manager: TreeManager) {
    manager.remove("svc-nginx").unwrap();
    manager
        .add_child_with_id("services", "svc-nginx", "nginx", NodeKind::Service)
        .unwrap();
    assert_eq!(manager.total_count(), 35);
    assert!(manager.node("svc-nginx").unwrap().attributes.is_empty());
}

// ============================================================
// Move
// ============================================================

#[rstest]
fn given_node_when_moving_then_reparents_with_subtree(mut manager: TreeManager) {
    manager.move_node("proc-sshd", "processes").unwrap();

    assert_eq!(
        child_ids(&manager, "processes"),
        vec!["proc-init", "proc-kthreadd", "proc-sshd"]
    );
    assert_eq!(child_ids(&manager, "proc-init"), vec!["proc-cron"]);
    assert_eq!(manager.parent_of("proc-bash").unwrap().unwrap().id, "proc-sshd");
    assert_eq!(manager.node_depth("proc-bash").unwrap(), 3);
    assert_eq!(manager.total_count(), 35);
}

#[rstest]
#[case("proc-init", "proc-init")]
#[case("proc-init", "proc-sshd")]
#[case("proc-init", "proc-bash")]
#[case("dir-root", "dir-var-log")]
fn given_own_descendant_when_moving_then_rejects_cycle(
    mut manager: TreeManager,
    #[case] id: &str,
    #[case] target: &str,
) {
    let err = manager.move_node(id, target).unwrap_err();
    assert!(matches!(err, DomainError::CycleDetected { .. }), "{:?}", err);
    assert_eq!(manager.depth(), 6);
    assert_eq!(manager.total_count(), 35);
}

#[rstest]
fn given_root_when_moving_then_fails(mut manager: TreeManager) {
    assert_eq!(
        manager.move_node(ROOT_ID, "processes").unwrap_err(),
        DomainError::RootMove
    );
}

#[rstest]
#[case("missing", "processes")]
#[case("proc-init", "missing")]
fn given_unknown_ids_when_moving_then_fails(
    mut manager: TreeManager,
    #[case] id: &str,
    #[case] target: &str,
) {
    assert_eq!(
        manager.move_node(id, target).unwrap_err(),
        DomainError::NodeNotFound("missing".into())
    );
}

// ============================================================
// Expand / collapse
// ============================================================

#[rstest]
fn given_collapsed_node_when_toggling_twice_then_returns_to_collapsed(mut manager: TreeManager) {
    assert!(manager.toggle("devices").unwrap());
    assert!(manager.node("devices").unwrap().expanded);
    assert!(!manager.toggle("devices").unwrap());
    assert!(!manager.node("devices").unwrap().expanded);
}

#[rstest]
fn given_expand_and_collapse_when_applied_then_sets_flag(mut manager: TreeManager) {
    manager.expand("users").unwrap();
    assert_eq!(manager.visible_rows().len(), 10);
    manager.collapse("users").unwrap();
    assert_eq!(manager.visible_rows().len(), 7);
    assert!(manager.expand("missing").is_err());
}

#[rstest]
fn given_expanded_tree_when_collapsing_all_then_root_stays_expanded(mut manager: TreeManager) {
    manager.expand_all();
    manager.collapse_all();
    assert!(manager.root().unwrap().expanded);
    assert_eq!(manager.visible_rows().len(), 7);
}

// ============================================================
// Attributes and rename
// ============================================================

#[rstest]
fn given_node_when_editing_attributes_then_returns_previous_values(mut manager: TreeManager) {
    assert_eq!(
        manager.set_attribute("svc-nginx", "status", "active").unwrap(),
        Some("inactive".to_string())
    );
    assert_eq!(manager.set_attribute("svc-nginx", "workers", "4").unwrap(), None);
    assert_eq!(
        manager.remove_attribute("svc-nginx", "workers").unwrap(),
        Some("4".to_string())
    );
    assert_eq!(manager.remove_attribute("svc-nginx", "workers").unwrap(), None);
}

#[rstest]
fn given_node_when_renaming_then_name_changes_and_blank_is_rejected(mut manager: TreeManager) {
    manager.rename("net-wlan0", "wlp2s0").unwrap();
    assert_eq!(manager.node("net-wlan0").unwrap().name, "wlp2s0");
    assert!(manager.rename("net-wlan0", " ").is_err());
}

// ============================================================
// Rebuild and clear
// ============================================================

#[rstest]
fn given_modified_tree_when_rebuilding_then_restores_template(mut manager: TreeManager) {
    manager.add_child("users", "mallory", NodeKind::User).unwrap();
    manager.remove("filesystem").unwrap();
    manager.expand_all();

    manager.rebuild().unwrap();

    let fresh = TreeManager::new();
    assert_eq!(manager.total_count(), 35);
    assert_eq!(manager.stats(), fresh.stats());
    assert_eq!(manager.visible_rows(), fresh.visible_rows());
    assert!(manager.find_by_name("mallory").is_empty());
}

#[rstest]
fn given_tree_when_clearing_then_only_root_remains(mut manager: TreeManager) {
    let removed = manager.clear().unwrap();

    assert_eq!(removed, 34);
    assert_eq!(manager.total_count(), 1);
    assert_eq!(manager.depth(), 1);
    assert_eq!(manager.leaf_count(), 1);
    assert_eq!(manager.branch_count(), 0);
    assert_eq!(manager.root().unwrap().id, ROOT_ID);
    assert!(manager.node("processes").is_none());
}

#[rstest]
fn given_cleared_tree_when_adding_and_rebuilding_then_works(mut manager: TreeManager) {
    manager.clear().unwrap();
    manager
        .add_child(ROOT_ID, "Containers", NodeKind::Category)
        .unwrap();
    assert_eq!(manager.total_count(), 2);
    manager.rebuild().unwrap();
    assert_eq!(manager.total_count(), 35);
}
