use std::collections::{HashMap, VecDeque};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{NodeData, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Payload of this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based tree structure.
///
/// Uses generational arena for memory-safe node references. A side table maps
/// node ids to arena indices, which keeps ids unique and makes lookup by id O(1).
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    ids: HashMap<NodeId, Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            ids: HashMap::new(),
        }
    }

    /// Inserts a node as the last child of `parent`, or as root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> DomainResult<Index> {
        if self.ids.contains_key(&data.id) {
            return Err(DomainError::DuplicateId(data.id));
        }
        match parent {
            Some(parent_idx) if !self.arena.contains(parent_idx) => {
                return Err(DomainError::InvalidIndex);
            }
            None if self.root.is_some() => return Err(DomainError::RootExists),
            _ => {}
        }

        let id = data.id.clone();
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });
        self.ids.insert(id, node_idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        Ok(node_idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    /// Looks up the arena index of a node id.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.ids.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Removes `idx` and all of its descendants.
    ///
    /// Returns the removed payloads in post-order (children before parents).
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> DomainResult<Vec<NodeData>> {
        let parent = self
            .get_node(idx)
            .ok_or(DomainError::InvalidIndex)?
            .parent;

        let doomed = self.subtree_postorder(idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&c| c != idx);
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }

        let mut removed = Vec::with_capacity(doomed.len());
        for node_idx in doomed {
            if let Some(node) = self.arena.remove(node_idx) {
                self.ids.remove(&node.data.id);
                removed.push(node.data);
            }
        }
        debug!("removed {} nodes", removed.len());
        Ok(removed)
    }

    /// Detaches `idx` and appends it as the last child of `new_parent`.
    ///
    /// Moving a node under itself or one of its descendants is rejected.
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(&mut self, idx: Index, new_parent: Index) -> DomainResult<()> {
        let node = self
            .get_node(idx)
            .ok_or(DomainError::InvalidIndex)?;
        let node_id = node.data.id.clone();
        let old_parent = node.parent.ok_or(DomainError::RootMove)?;
        let target = self
            .get_node(new_parent)
            .ok_or(DomainError::InvalidIndex)?;

        if self.is_ancestor(idx, new_parent) {
            return Err(DomainError::CycleDetected {
                node: node_id,
                target: target.data.id.clone(),
            });
        }

        if let Some(parent) = self.arena.get_mut(old_parent) {
            parent.children.retain(|&c| c != idx);
        }
        if let Some(parent) = self.arena.get_mut(new_parent) {
            parent.children.push(idx);
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }

    /// True when `ancestor` is `idx` itself or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = Some(idx);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.get_node(c).and_then(|n| n.parent);
        }
        false
    }

    /// Level of a node, root = 0.
    pub fn level_of(&self, idx: Index) -> Option<usize> {
        let mut node = self.get_node(idx)?;
        let mut level = 0;
        while let Some(parent) = node.parent {
            node = self.get_node(parent)?;
            level += 1;
        }
        Some(level)
    }

    /// Indices from the root down to `idx`, both included.
    pub fn path_to(&self, idx: Index) -> Vec<Index> {
        let mut path = Vec::new();
        let mut current = self.get_node(idx).map(|_| idx);
        while let Some(c) = current {
            path.push(c);
            current = self.get_node(c).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }

    fn subtree_postorder(&self, idx: Index) -> Vec<Index> {
        PostOrderIterator::from_index(self, Some(idx))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn subtree_size(&self, idx: Index) -> usize {
        TreeIterator::from_index(self, Some(idx)).count()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::from_index(self, self.root)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::from_index(self, self.root)
    }

    /// Breadth-first iteration yielding `(level, index, node)`, root at level 0.
    pub fn iter_levels(&self) -> LevelIterator {
        LevelIterator::new(self)
    }

    /// Number of levels in the tree. Empty tree = 0, root only = 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf nodes (nodes with no children) in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<&NodeData> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves<'a>(&'a self, node_idx: Index, leaves: &mut Vec<&'a NodeData>) {
        if let Some(node) = self.get_node(node_idx) {
            if node.children.is_empty() {
                leaves.push(&node.data);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.arena.iter().filter(|(_, n)| n.is_leaf()).count()
    }

    pub fn branch_count(&self) -> usize {
        self.arena.iter().filter(|(_, n)| !n.is_leaf()).count()
    }

    /// Mutable access to every payload, in arena order.
    pub fn data_mut(&mut self) -> impl Iterator<Item = &mut NodeData> {
        self.arena.iter_mut().map(|(_, n)| &mut n.data)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn from_index(arena: &'a TreeArena, start: Option<Index>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn from_index(arena: &'a TreeArena, start: Option<Index>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

pub struct LevelIterator<'a> {
    arena: &'a TreeArena,
    queue: VecDeque<(usize, Index)>,
}

impl<'a> LevelIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = arena.root() {
            queue.push_back((0, root));
        }
        Self { arena, queue }
    }
}

impl<'a> Iterator for LevelIterator<'a> {
    type Item = (usize, Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((level, current_idx)) = self.queue.pop_front() {
            if let Some(node) = self.arena.get_node(current_idx) {
                for &child in &node.children {
                    self.queue.push_back((level + 1, child));
                }
                return Some((level, current_idx, node));
            }
        }
        None
    }
}
