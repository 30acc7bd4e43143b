//! Interactive line shell over a [`TreeManager`].
//!
//! Each input line is split into shell words (quotes keep spaces) and parsed
//! with clap as one shell command. Failed commands
//! are reported and the session continues; the tree only lives for the
//! duration of the session.

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};
use colored::Colorize;
use regex::Regex;
use tracing::{debug, instrument};

use crate::cli::error::{CliError, CliResult};
use crate::cli::view;
use crate::domain::{NodeKind, RenderOptions, TreeManager};

pub const PROMPT: &str = "systree> ";

#[derive(Parser, Debug)]
#[command(name = "shell", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Add a node: add <parent-id> <kind> <name..> [--id <id>]
    Add {
        parent: String,
        #[arg(value_enum)]
        kind: NodeKind,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// Remove a node and its subtree
    #[command(alias = "remove")]
    Rm { id: String },
    /// Move a node under a new parent
    #[command(alias = "move")]
    Mv { id: String, parent: String },
    /// Flip a node between expanded and collapsed
    Toggle { id: String },
    /// Expand a node
    Expand { id: String },
    /// Collapse a node
    Collapse { id: String },
    /// Expand every node
    ExpandAll,
    /// Collapse every node below the root
    CollapseAll,
    /// Rename a node
    Rename {
        id: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Set or remove node attributes
    Attr {
        #[command(subcommand)]
        command: AttrCommand,
    },
    /// Discard all changes and rebuild from the template
    Rebuild,
    /// Remove everything below the root
    Clear,
    /// Print the tree
    Tree {
        #[arg(short, long)]
        all: bool,
    },
    /// List visible nodes with expand markers
    Ls,
    /// Show statistics
    Stats,
    /// Find nodes by name
    Find {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(short, long)]
        regex: bool,
    },
    /// Show one node
    Get { id: String },
    /// List nodes on a level (root = 0)
    Level { level: usize },
    /// List leaf nodes
    Leaves,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
enum AttrCommand {
    /// attr set <id> <key> <value..>
    Set {
        id: String,
        key: String,
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },
    /// attr rm <id> <key>
    Rm { id: String, key: String },
}

/// Whether the session goes on after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub struct Shell {
    manager: TreeManager,
    render: RenderOptions,
}

impl Shell {
    pub fn new(manager: TreeManager, render: RenderOptions) -> Self {
        Self { manager, render }
    }

    pub fn manager(&self) -> &TreeManager {
        &self.manager
    }

    /// Read lines until EOF or `quit`.
    ///
    /// Errors from individual commands are written to `out`; only output
    /// failures end the session early.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write, interactive: bool) -> CliResult<()> {
        if interactive {
            writeln!(out, "{}", "Type 'help' for commands, 'quit' to leave.".dimmed())?;
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            match self.execute_line(&line, out) {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Continue) => {}
                Err(CliError::Infra(crate::infrastructure::InfraError::Io { source, .. })) => {
                    return Err(source.into())
                }
                Err(e) => writeln!(out, "{}: {}", "error".red().bold(), e)?,
            }
            if interactive {
                write!(out, "{}", PROMPT)?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Parse and execute one line.
    #[instrument(level = "debug", skip(self, out))]
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> CliResult<Outcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Continue);
        }
        let words = shlex::split(line)
            .ok_or_else(|| CliError::InvalidArgs(format!("unbalanced quotes: {}", line)))?;
        match ShellLine::try_parse_from(words) {
            Ok(parsed) => self.execute(parsed.command, out),
            Err(e) => {
                // clap renders help and usage errors alike
                write!(out, "{}", e.render())?;
                Ok(Outcome::Continue)
            }
        }
    }

    fn execute(&mut self, command: ShellCommand, out: &mut impl Write) -> CliResult<Outcome> {
        debug!("shell command: {:?}", command);
        let m = &mut self.manager;
        match command {
            ShellCommand::Add {
                parent,
                kind,
                name,
                id,
            } => {
                let name = name.join(" ");
                let id = match id {
                    Some(id) => m.add_child_with_id(&parent, &id, &name, kind)?,
                    None => m.add_child(&parent, &name, kind)?,
                };
                writeln!(out, "added {} [{}]", name, id.green())?;
            }
            ShellCommand::Rm { id } => {
                let removed = m.remove(&id)?;
                writeln!(out, "removed {} ({} nodes)", id, removed)?;
            }
            ShellCommand::Mv { id, parent } => {
                m.move_node(&id, &parent)?;
                writeln!(out, "moved {} under {}", id, parent)?;
            }
            ShellCommand::Toggle { id } => {
                let expanded = m.toggle(&id)?;
                let state = if expanded { "expanded" } else { "collapsed" };
                writeln!(out, "{} {}", id, state)?;
            }
            ShellCommand::Expand { id } => {
                m.expand(&id)?;
                writeln!(out, "{} expanded", id)?;
            }
            ShellCommand::Collapse { id } => {
                m.collapse(&id)?;
                writeln!(out, "{} collapsed", id)?;
            }
            ShellCommand::ExpandAll => {
                m.expand_all();
                writeln!(out, "all nodes expanded")?;
            }
            ShellCommand::CollapseAll => {
                m.collapse_all();
                writeln!(out, "all nodes collapsed")?;
            }
            ShellCommand::Rename { id, name } => {
                m.rename(&id, &name.join(" "))?;
                writeln!(out, "renamed {}", id)?;
            }
            ShellCommand::Attr { command } => match command {
                AttrCommand::Set { id, key, value } => {
                    let value = value.join(" ");
                    m.set_attribute(&id, &key, &value)?;
                    writeln!(out, "{}: {} = {}", id, key, value)?;
                }
                AttrCommand::Rm { id, key } => match m.remove_attribute(&id, &key)? {
                    Some(_) => writeln!(out, "{}: {} removed", id, key)?,
                    None => writeln!(out, "{}: no attribute {}", id, key)?,
                },
            },
            ShellCommand::Rebuild => {
                m.rebuild()?;
                writeln!(out, "rebuilt tree ({} nodes)", m.total_count())?;
            }
            ShellCommand::Clear => {
                let removed = m.clear()?;
                writeln!(out, "cleared tree ({} nodes removed)", removed)?;
            }
            ShellCommand::Tree { all } => {
                let opts = RenderOptions {
                    show_all: all || self.render.show_all,
                    ..self.render
                };
                view::write_tree(out, m, &opts)?;
            }
            ShellCommand::Ls => view::write_rows(out, &m.visible_rows())?,
            ShellCommand::Stats => view::write_stats(out, &m.stats())?,
            ShellCommand::Find { query, regex } => {
                let query = query.join(" ");
                let matches = if regex {
                    let pattern = Regex::new(&query)
                        .map_err(|e| CliError::InvalidArgs(format!("regex {:?}: {}", query, e)))?;
                    m.find_by_pattern(&pattern)
                } else {
                    m.find_by_name(&query)
                };
                view::write_nodes(out, &matches, "no matches")?;
            }
            ShellCommand::Get { id } => view::write_node_details(out, m, &id)?,
            ShellCommand::Level { level } => {
                view::write_nodes(out, &m.nodes_at_level(level), &format!("no nodes at level {}", level))?
            }
            ShellCommand::Leaves => view::write_nodes(out, &m.leaves(), "no leaves")?,
            ShellCommand::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_shell_commands() {
        ShellLine::command().debug_assert();
    }
}
