//! Tree builder turning a declarative template into an arena tree.

use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::entities::TemplateNode;
use crate::domain::error::{DomainError, DomainResult};

/// Constructs arena trees from [`TemplateNode`] descriptions.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a template, preserving child order.
    ///
    /// Fails on duplicate ids and blank names or ids; nothing is returned in that case.
    #[instrument(level = "debug", skip(self, template), fields(root = %template.id))]
    pub fn build(&self, template: &TemplateNode) -> DomainResult<TreeArena> {
        let mut tree = TreeArena::new();
        let mut stack = vec![(template, None)];

        while let Some((current, parent_idx)) = stack.pop() {
            if current.id.trim().is_empty() {
                return Err(DomainError::InvalidId(current.id.clone()));
            }
            if current.name.trim().is_empty() {
                return Err(DomainError::InvalidName(current.name.clone()));
            }

            let current_idx = tree.insert_node(current.to_node_data(), parent_idx)?;

            // Reverse push keeps children in declaration order
            for child in current.children.iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }
}

/// Validate a template without keeping the resulting tree.
pub fn validate_template(template: &TemplateNode) -> DomainResult<()> {
    TreeBuilder::new().build(template).map(|_| ())
}
