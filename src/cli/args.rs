//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Mock operating system explorer: browse and edit an in-memory node tree
#[derive(Parser, Debug)]
#[command(name = "systree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .systree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// TOML template to build the tree from (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub template: Option<PathBuf>,

    /// Show node ids in tree output
    #[arg(long, global = true)]
    pub show_ids: bool,

    /// Show node attributes in tree output
    #[arg(long, global = true)]
    pub show_attributes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree (default command)
    Tree {
        /// Ignore collapsed state and print every node
        #[arg(short, long)]
        all: bool,
    },

    /// Show node counts, depth and per-kind totals
    Stats,

    /// Find nodes by name (case-insensitive substring)
    Find {
        /// Search text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Treat the query as a regular expression
        #[arg(short, long)]
        regex: bool,
    },

    /// Show one node with its path and attributes
    Get {
        /// Node id
        id: String,
    },

    /// List the nodes on one level (root = 0)
    Level {
        /// Level number
        level: usize,
    },

    /// List leaf nodes
    Leaves,

    /// Interactive shell: add, remove, move, expand and collapse nodes
    Shell,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
