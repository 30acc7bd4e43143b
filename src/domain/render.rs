/*
termtree rendering of the arena tree.

Collapsed branches are cut off unless `show_all` is set; they end with a
`[+N]` marker counting the hidden direct children.
 */
use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::arena::{TreeArena, TreeNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Ignore expanded flags and render every node
    pub show_all: bool,
    pub show_ids: bool,
    pub show_kinds: bool,
    pub show_attributes: bool,
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, opts: &RenderOptions) -> Tree<String>;
}

/// Display label of a single node.
pub fn node_label(node: &TreeNode, opts: &RenderOptions) -> String {
    let data = &node.data;
    let mut label = data.name.clone();
    if opts.show_kinds {
        label.push_str(&format!(" ({})", data.kind));
    }
    if opts.show_ids {
        label.push_str(&format!(" [{}]", data.id));
    }
    if opts.show_attributes && !data.attributes.is_empty() {
        let attrs = data
            .attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .join(", ");
        label.push_str(&format!(" {{{}}}", attrs));
    }
    if !opts.show_all && !data.expanded && !node.children.is_empty() {
        label.push_str(&format!(" [+{}]", node.children.len()));
    }
    label
}

impl TreeNodeConvert for TreeArena {
    fn to_tree_string(&self, opts: &RenderOptions) -> Tree<String> {
        fn build_tree(
            arena: &TreeArena,
            node_idx: Index,
            parent_tree: &mut Tree<String>,
            opts: &RenderOptions,
        ) {
            if let Some(node) = arena.get_node(node_idx) {
                if !opts.show_all && !node.data.expanded {
                    return;
                }
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(node_label(child, opts));
                        build_tree(arena, child_idx, &mut child_tree, opts);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(node_label(root, opts));
                build_tree(self, root_idx, &mut tree, opts);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NodeData, NodeKind};

    fn sample() -> TreeArena {
        let mut tree = TreeArena::new();
        let root = tree
            .insert_node(
                NodeData::new("os", "OS", NodeKind::Root).with_expanded(true),
                None,
            )
            .unwrap();
        let net = tree
            .insert_node(NodeData::new("net", "Network", NodeKind::Category), Some(root))
            .unwrap();
        tree.insert_node(
            NodeData::new("lo", "lo", NodeKind::NetworkInterface).with_attribute("mtu", "65536"),
            Some(net),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_collapsed_branch_is_cut_with_marker() {
        let rendered = sample().to_tree_string(&RenderOptions::default()).to_string();
        assert!(rendered.contains("Network [+1]"));
        assert!(!rendered.contains("lo"));
    }

    #[test]
    fn test_show_all_renders_everything_with_details() {
        let opts = RenderOptions {
            show_all: true,
            show_ids: true,
            show_kinds: true,
            show_attributes: true,
        };
        let rendered = sample().to_tree_string(&opts).to_string();
        assert!(rendered.contains("Network (category) [net]"));
        assert!(rendered.contains("lo (network-interface) [lo] {mtu=65536}"));
        assert!(!rendered.contains("[+"));
    }

    #[test]
    fn test_empty_tree() {
        let rendered = TreeArena::new()
            .to_tree_string(&RenderOptions::default())
            .to_string();
        assert_eq!(rendered.trim(), "Empty tree");
    }
}
