//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Unique identity of a node within one tree.
pub type NodeId = String;

/// Categorical type tag of a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    Category,
    Process,
    Directory,
    File,
    NetworkInterface,
    User,
    Service,
    Device,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Root,
        NodeKind::Category,
        NodeKind::Process,
        NodeKind::Directory,
        NodeKind::File,
        NodeKind::NetworkInterface,
        NodeKind::User,
        NodeKind::Service,
        NodeKind::Device,
    ];

    /// Kebab-case name, also used as prefix for generated ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Category => "category",
            NodeKind::Process => "process",
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
            NodeKind::NetworkInterface => "network-interface",
            NodeKind::User => "user",
            NodeKind::Service => "service",
            NodeKind::Device => "device",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        NodeKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidTemplate(format!("unknown node kind: {}", s)))
    }
}

/// Data payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Whether the children of this node are shown
    pub expanded: bool,
    /// Free-form key/value attributes, e.g. `pid = 1`
    pub attributes: BTreeMap<String, String>,
}

impl NodeData {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            expanded: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Declarative description of a tree, used for the built-in template and
/// for TOML template files.
///
/// ```toml
/// id = "root"
/// name = "Operating System"
/// kind = "root"
/// expanded = true
///
/// [[children]]
/// id = "processes"
/// name = "Processes"
/// kind = "category"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            expanded: false,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }

    pub fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn to_node_data(&self) -> NodeData {
        NodeData {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            expanded: self.expanded,
            attributes: self.attributes.clone(),
        }
    }
}

/// Aggregated statistics of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub total: usize,
    /// Nodes with at least one child
    pub branches: usize,
    /// Nodes without children
    pub leaves: usize,
    /// Number of levels, root only = 1
    pub depth: usize,
    pub by_kind: BTreeMap<NodeKind, usize>,
}

/// One row of the flattened, expansion-aware view of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    /// Root = 0
    pub level: usize,
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub child_count: usize,
    pub expanded: bool,
}
