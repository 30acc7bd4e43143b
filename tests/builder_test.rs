//! Tests for TreeBuilder and custom templates

use rstest::rstest;

use systree::domain::{
    os_template, DomainError, NodeKind, TemplateNode, TreeBuilder, TreeManager,
};

fn small_template() -> TemplateNode {
    TemplateNode::new("box", "Box", NodeKind::Root)
        .expanded()
        .child(
            TemplateNode::new("procs", "Processes", NodeKind::Category)
                .child(TemplateNode::new("p1", "init", NodeKind::Process))
                .child(TemplateNode::new("p2", "getty", NodeKind::Process)),
        )
        .child(TemplateNode::new("users", "Users", NodeKind::Category))
}

#[test]
fn given_template_when_building_then_preserves_child_order() {
    let tree = TreeBuilder::new().build(&small_template()).unwrap();

    assert_eq!(tree.len(), 5);
    let order: Vec<_> = tree.iter().map(|(_, n)| n.data.id.clone()).collect();
    assert_eq!(order, vec!["box", "procs", "p1", "p2", "users"]);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn given_builtin_template_when_building_then_has_35_nodes() {
    let tree = TreeBuilder::new().build(&os_template()).unwrap();
    assert_eq!(tree.len(), 35);
}

#[rstest]
#[case::duplicate_id(
    TemplateNode::new("a", "A", NodeKind::Root).child(TemplateNode::new("a", "B", NodeKind::File)),
    DomainError::DuplicateId("a".into())
)]
#[case::blank_name(
    TemplateNode::new("a", "A", NodeKind::Root).child(TemplateNode::new("b", " ", NodeKind::File)),
    DomainError::InvalidName(" ".into())
)]
#[case::blank_id(
    TemplateNode::new("", "A", NodeKind::Root),
    DomainError::InvalidId("".into())
)]
fn given_invalid_template_when_building_then_fails(
    #[case] template: TemplateNode,
    #[case] expected: DomainError,
) {
    assert_eq!(TreeBuilder::new().build(&template).unwrap_err(), expected);
}

#[test]
fn given_custom_template_when_managing_then_rebuild_uses_it() {
    let mut manager = TreeManager::with_template(small_template()).unwrap();
    manager.remove("procs").unwrap();
    assert_eq!(manager.total_count(), 2);

    manager.rebuild().unwrap();

    assert_eq!(manager.total_count(), 5);
    assert_eq!(manager.root().unwrap().name, "Box");
}

#[test]
fn given_invalid_template_when_creating_manager_then_fails() {
    let bad = TemplateNode::new("x", "X", NodeKind::Root).child(TemplateNode::new("x", "Y", NodeKind::File));

    assert_eq!(
        TreeManager::with_template(bad).unwrap_err(),
        DomainError::DuplicateId("x".into())
    );
}
