//! Command dispatch for the one-shot CLI commands

use std::io::{self, IsTerminal, Write};

use clap::CommandFactory;
use clap_complete::generate;
use regex::Regex;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::Shell;
use crate::cli::view;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree { all }) => _tree(&container, *all),
        Some(Commands::Stats) => _stats(&container),
        Some(Commands::Find { query, regex }) => _find(&container, &query.join(" "), *regex),
        Some(Commands::Get { id }) => _get(&container, id),
        Some(Commands::Level { level }) => _level(&container, *level),
        Some(Commands::Leaves) => _leaves(&container),
        Some(Commands::Shell) => _shell(&container),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(&container),
            ConfigCommands::Path => _config_path(cli),
        },
        Some(Commands::Completion { .. }) => Ok(()),
        None => _tree(&container, false),
    }
}

/// Layered settings plus command line overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(template) = &cli.template {
        settings.template_file = Some(template.clone());
    }
    if cli.show_ids {
        settings.display.show_ids = true;
    }
    if cli.show_attributes {
        settings.display.show_attributes = true;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, all: bool) -> CliResult<()> {
    let manager = container.tree_manager()?;
    let mut opts = container.settings.render_options();
    opts.show_all |= all;
    view::write_tree(&mut io::stdout().lock(), &manager, &opts)
}

#[instrument(skip(container))]
fn _stats(container: &ServiceContainer) -> CliResult<()> {
    let manager = container.tree_manager()?;
    view::write_stats(&mut io::stdout().lock(), &manager.stats())
}

#[instrument(skip(container))]
fn _find(container: &ServiceContainer, query: &str, regex: bool) -> CliResult<()> {
    let manager = container.tree_manager()?;
    let matches = if regex {
        let pattern = Regex::new(query)
            .map_err(|e| CliError::InvalidArgs(format!("regex {:?}: {}", query, e)))?;
        manager.find_by_pattern(&pattern)
    } else {
        manager.find_by_name(query)
    };
    view::write_nodes(&mut io::stdout().lock(), &matches, "no matches")
}

#[instrument(skip(container))]
fn _get(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let manager = container.tree_manager()?;
    view::write_node_details(&mut io::stdout().lock(), &manager, id)
}

#[instrument(skip(container))]
fn _level(container: &ServiceContainer, level: usize) -> CliResult<()> {
    let manager = container.tree_manager()?;
    view::write_nodes(
        &mut io::stdout().lock(),
        &manager.nodes_at_level(level),
        &format!("no nodes at level {}", level),
    )
}

#[instrument(skip(container))]
fn _leaves(container: &ServiceContainer) -> CliResult<()> {
    let manager = container.tree_manager()?;
    view::write_nodes(&mut io::stdout().lock(), &manager.leaves(), "no leaves")
}

#[instrument(skip(container))]
fn _shell(container: &ServiceContainer) -> CliResult<()> {
    let manager = container.tree_manager()?;
    let mut shell = Shell::new(manager, container.settings.render_options());
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    shell.run(stdin.lock(), &mut stdout, interactive)?;
    stdout.flush()?;
    Ok(())
}

fn _config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn _config_path(cli: &Cli) -> CliResult<()> {
    output::header("Config files");
    match global_config_path() {
        Some(path) => output::detail(&format!("global: {}", path.display())),
        None => output::detail("global: (no config directory)"),
    }
    let dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    output::detail(&format!("local:  {}", local_config_path(&dir).display()));
    Ok(())
}
