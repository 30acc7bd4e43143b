//! Tree manager: queries and mutations over one mock operating system tree.

use generational_arena::Index;
use regex::Regex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::arena::TreeArena;
use crate::domain::builder::TreeBuilder;
use crate::domain::entities::{NodeData, NodeId, NodeKind, TemplateNode, TreeStats, VisibleRow};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::template::os_template;

/// Owns a single tree plus the template used to rebuild it.
///
/// Every mutation either succeeds completely or returns an error and leaves
/// the tree untouched.
#[derive(Debug)]
pub struct TreeManager {
    tree: TreeArena,
    template: TemplateNode,
}

impl Default for TreeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeManager {
    /// Manager populated from the built-in operating system template.
    pub fn new() -> Self {
        let template = os_template();
        let built = TreeBuilder::new().build(&template);
        debug_assert!(built.is_ok(), "built-in template: {:?}", built.as_ref().err());
        Self {
            tree: built.unwrap_or_default(),
            template,
        }
    }

    /// Manager populated from a custom template.
    pub fn with_template(template: TemplateNode) -> DomainResult<Self> {
        let tree = TreeBuilder::new().build(&template)?;
        Ok(Self { tree, template })
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn template(&self) -> &TemplateNode {
        &self.template
    }

    fn index_of(&self, id: &str) -> DomainResult<Index> {
        self.tree
            .find(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
    }

    fn data_at(&self, idx: Index) -> Option<&NodeData> {
        self.tree.get_node(idx).map(|n| &n.data)
    }

    fn data_mut(&mut self, id: &str) -> DomainResult<&mut NodeData> {
        let idx = self.index_of(id)?;
        self.tree
            .get_node_mut(idx)
            .map(|n| &mut n.data)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn root(&self) -> Option<&NodeData> {
        self.tree.root_node().map(|n| &n.data)
    }

    /// Find a node by its id.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.tree.find(id).and_then(|idx| self.data_at(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tree.contains_id(id)
    }

    pub fn parent_of(&self, id: &str) -> DomainResult<Option<&NodeData>> {
        let idx = self.index_of(id)?;
        Ok(self
            .tree
            .get_node(idx)
            .and_then(|n| n.parent)
            .and_then(|p| self.data_at(p)))
    }

    /// Direct children of a node, in insertion order.
    pub fn children(&self, id: &str) -> DomainResult<Vec<&NodeData>> {
        let idx = self.index_of(id)?;
        Ok(self
            .tree
            .get_node(idx)
            .map(|n| n.children.iter().filter_map(|&c| self.data_at(c)).collect())
            .unwrap_or_default())
    }

    /// Case-insensitive substring search on names, in pre-order.
    ///
    /// An empty (or whitespace) query matches nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_name(&self, query: &str) -> Vec<&NodeData> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.tree
            .iter()
            .filter(|(_, n)| n.data.name.to_lowercase().contains(&needle))
            .map(|(_, n)| &n.data)
            .collect()
    }

    /// Regex search on names, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_pattern(&self, pattern: &Regex) -> Vec<&NodeData> {
        self.tree
            .iter()
            .filter(|(_, n)| pattern.is_match(&n.data.name))
            .map(|(_, n)| &n.data)
            .collect()
    }

    /// Number of levels in the tree, root only = 1.
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Level of a node, root = 0.
    pub fn node_depth(&self, id: &str) -> DomainResult<usize> {
        let idx = self.index_of(id)?;
        self.tree
            .level_of(idx)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
    }

    pub fn total_count(&self) -> usize {
        self.tree.len()
    }

    pub fn branch_count(&self) -> usize {
        self.tree.branch_count()
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// All nodes on `level` (root = 0), left to right.
    pub fn nodes_at_level(&self, level: usize) -> Vec<&NodeData> {
        self.tree
            .iter_levels()
            .skip_while(|(l, _, _)| *l < level)
            .take_while(|(l, _, _)| *l == level)
            .map(|(_, _, n)| &n.data)
            .collect()
    }

    pub fn leaves(&self) -> Vec<&NodeData> {
        self.tree.leaf_nodes()
    }

    /// Nodes from the root down to `id`, both included.
    pub fn path_to(&self, id: &str) -> DomainResult<Vec<&NodeData>> {
        let idx = self.index_of(id)?;
        Ok(self
            .tree
            .path_to(idx)
            .into_iter()
            .filter_map(|i| self.data_at(i))
            .collect())
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            total: self.total_count(),
            branches: self.branch_count(),
            leaves: self.leaf_count(),
            depth: self.depth(),
            ..Default::default()
        };
        for (_, node) in self.tree.iter() {
            *stats.by_kind.entry(node.data.kind).or_insert(0) += 1;
        }
        stats
    }

    /// Pre-order rows of every node whose ancestors are all expanded.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, Index)> = self.tree.root().map(|r| (0, r)).into_iter().collect();

        while let Some((level, idx)) = stack.pop() {
            let Some(node) = self.tree.get_node(idx) else {
                continue;
            };
            rows.push(VisibleRow {
                level,
                id: node.data.id.clone(),
                name: node.data.name.clone(),
                kind: node.data.kind,
                child_count: node.children.len(),
                expanded: node.data.expanded,
            });
            if node.data.expanded {
                for &child in node.children.iter().rev() {
                    stack.push((level + 1, child));
                }
            }
        }
        rows
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add a child with a generated id; returns the new id.
    pub fn add_child(&mut self, parent_id: &str, name: &str, kind: NodeKind) -> DomainResult<NodeId> {
        let id = self.generate_id(kind);
        self.add_child_with_id(parent_id, &id, name, kind)
    }

    /// Add a child with an explicit id as the last child of `parent_id`.
    ///
    /// The parent is expanded so the new node is visible.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child_with_id(
        &mut self,
        parent_id: &str,
        id: &str,
        name: &str,
        kind: NodeKind,
    ) -> DomainResult<NodeId> {
        let id = id.trim();
        let name = name.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidId(id.to_string()));
        }
        if name.is_empty() {
            return Err(DomainError::InvalidName(name.to_string()));
        }
        let parent_idx = self.index_of(parent_id)?;

        self.tree
            .insert_node(NodeData::new(id, name, kind), Some(parent_idx))?;
        if let Some(parent) = self.tree.get_node_mut(parent_idx) {
            parent.data.expanded = true;
        }
        info!("added {} ({}) under {}", id, kind, parent_id);
        Ok(id.to_string())
    }

    fn generate_id(&self, kind: NodeKind) -> NodeId {
        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let candidate = format!("{}-{}", kind, &suffix[..8]);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Remove a node and its subtree; returns the number of removed nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &str) -> DomainResult<usize> {
        let idx = self.index_of(id)?;
        if self.tree.root() == Some(idx) {
            return Err(DomainError::RootRemoval);
        }
        let removed = self.tree.remove_subtree(idx)?;
        info!("removed {} ({} nodes)", id, removed.len());
        Ok(removed.len())
    }

    /// Move a node (with its subtree) to the end of `new_parent_id`'s children.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, id: &str, new_parent_id: &str) -> DomainResult<()> {
        let idx = self.index_of(id)?;
        let new_parent = self.index_of(new_parent_id)?;
        if self.tree.root() == Some(idx) {
            return Err(DomainError::RootMove);
        }
        self.tree.reparent(idx, new_parent)?;
        if let Some(parent) = self.tree.get_node_mut(new_parent) {
            parent.data.expanded = true;
        }
        info!("moved {} under {}", id, new_parent_id);
        Ok(())
    }

    /// Flip the expanded flag; returns the new state.
    pub fn toggle(&mut self, id: &str) -> DomainResult<bool> {
        let data = self.data_mut(id)?;
        data.expanded = !data.expanded;
        debug!("toggled {} -> expanded={}", id, data.expanded);
        Ok(data.expanded)
    }

    pub fn expand(&mut self, id: &str) -> DomainResult<()> {
        self.data_mut(id)?.expanded = true;
        Ok(())
    }

    pub fn collapse(&mut self, id: &str) -> DomainResult<()> {
        self.data_mut(id)?.expanded = false;
        Ok(())
    }

    pub fn expand_all(&mut self) {
        self.tree.data_mut().for_each(|d| d.expanded = true);
    }

    /// Collapse everything below the root; the root stays expanded.
    pub fn collapse_all(&mut self) {
        let root = self.tree.root();
        self.tree.data_mut().for_each(|d| d.expanded = false);
        if let Some(root) = root.and_then(|r| self.tree.get_node_mut(r)) {
            root.data.expanded = true;
        }
    }

    pub fn rename(&mut self, id: &str, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName(name.to_string()));
        }
        self.data_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Set an attribute; returns the previous value.
    pub fn set_attribute(&mut self, id: &str, key: &str, value: &str) -> DomainResult<Option<String>> {
        Ok(self
            .data_mut(id)?
            .attributes
            .insert(key.to_string(), value.to_string()))
    }

    /// Remove an attribute; returns the removed value.
    pub fn remove_attribute(&mut self, id: &str, key: &str) -> DomainResult<Option<String>> {
        Ok(self.data_mut(id)?.attributes.remove(key))
    }

    /// Discard the current tree and repopulate it from the template.
    #[instrument(level = "debug", skip(self))]
    pub fn rebuild(&mut self) -> DomainResult<()> {
        self.tree = TreeBuilder::new().build(&self.template)?;
        info!("rebuilt tree: {} nodes", self.tree.len());
        Ok(())
    }

    /// Drop every node below the root; returns the number of removed nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) -> DomainResult<usize> {
        let root = self.tree.root().ok_or(DomainError::EmptyTree)?;
        let children = self
            .tree
            .get_node(root)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        let mut removed = 0;
        for child in children {
            removed += self.tree.remove_subtree(child)?.len();
        }
        info!("cleared tree: {} nodes removed", removed);
        Ok(removed)
    }
}
