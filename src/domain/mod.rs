//! Domain layer: entities and tree logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod manager;
pub mod render;
pub mod template;

pub use arena::{TreeArena, TreeNode};
pub use builder::{validate_template, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use manager::TreeManager;
pub use render::{node_label, RenderOptions, TreeNodeConvert};
pub use template::{os_template, ROOT_ID};
