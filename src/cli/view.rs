//! Writer-based views of the tree, shared by one-shot commands and the shell.

use std::io::Write;

use colored::Colorize;
use itertools::Itertools;

use crate::cli::error::CliResult;
use crate::domain::{NodeData, RenderOptions, TreeManager, TreeNodeConvert, TreeStats, VisibleRow};

pub fn write_tree(out: &mut impl Write, manager: &TreeManager, opts: &RenderOptions) -> CliResult<()> {
    write!(out, "{}", manager.tree().to_tree_string(opts))?;
    Ok(())
}

pub fn write_stats(out: &mut impl Write, stats: &TreeStats) -> CliResult<()> {
    writeln!(out, "{}", "Tree statistics".cyan().bold())?;
    writeln!(out, "  {:<18} {}", "total", stats.total)?;
    writeln!(out, "  {:<18} {}", "branches", stats.branches)?;
    writeln!(out, "  {:<18} {}", "leaves", stats.leaves)?;
    writeln!(out, "  {:<18} {}", "depth", stats.depth)?;
    writeln!(out, "{}", "By kind".cyan().bold())?;
    for (kind, count) in &stats.by_kind {
        writeln!(out, "  {:<18} {}", kind.to_string(), count)?;
    }
    Ok(())
}

/// One line per node: `id  name (kind)`.
pub fn write_nodes(out: &mut impl Write, nodes: &[&NodeData], empty_msg: &str) -> CliResult<()> {
    if nodes.is_empty() {
        writeln!(out, "{}", empty_msg.yellow())?;
        return Ok(());
    }
    let width = nodes.iter().map(|n| n.id.len()).max().unwrap_or(0);
    for node in nodes {
        writeln!(out, "{:<width$}  {} ({})", node.id, node.name, node.kind, width = width)?;
    }
    Ok(())
}

pub fn write_node_details(out: &mut impl Write, manager: &TreeManager, id: &str) -> CliResult<()> {
    let node = manager
        .node(id)
        .ok_or_else(|| crate::domain::DomainError::NodeNotFound(id.to_string()))?;
    let path = manager.path_to(id)?.iter().map(|n| n.name.as_str()).join(" / ");
    let children = manager.children(id)?;

    writeln!(out, "{}", node.name.bold())?;
    writeln!(out, "  {:<10} {}", "id", node.id)?;
    writeln!(out, "  {:<10} {}", "kind", node.kind)?;
    writeln!(out, "  {:<10} {}", "path", path)?;
    writeln!(out, "  {:<10} {}", "level", manager.node_depth(id)?)?;
    writeln!(out, "  {:<10} {}", "children", children.len())?;
    writeln!(out, "  {:<10} {}", "expanded", node.expanded)?;
    if !node.attributes.is_empty() {
        writeln!(out, "  {}", "attributes".cyan())?;
        for (key, value) in &node.attributes {
            writeln!(out, "    {} = {}", key, value)?;
        }
    }
    Ok(())
}

/// Indented list of visible rows with expand markers.
pub fn write_rows(out: &mut impl Write, rows: &[VisibleRow]) -> CliResult<()> {
    for row in rows {
        let marker = match (row.child_count, row.expanded) {
            (0, _) => " ",
            (_, true) => "-",
            (_, false) => "+",
        };
        writeln!(
            out,
            "{}{} {} [{}]",
            "  ".repeat(row.level),
            marker,
            row.name,
            row.id.dimmed()
        )?;
    }
    Ok(())
}
