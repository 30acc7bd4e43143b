//! Argument parsing tests for the one-shot CLI

use clap::{CommandFactory, Parser};
use rstest::rstest;

use systree::cli::args::ConfigCommands;
use systree::cli::{Cli, Commands};

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn given_find_with_words_when_parsing_then_collects_query() {
    let cli = Cli::try_parse_from(["systree", "find", "-r", "^eth", "x"]).unwrap();
    match cli.command {
        Some(Commands::Find { query, regex }) => {
            assert!(regex);
            assert_eq!(query, vec!["^eth", "x"]);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_applies_them() {
    let cli = Cli::try_parse_from(["systree", "tree", "--all", "--show-ids", "-dd"]).unwrap();
    assert!(cli.show_ids);
    assert_eq!(cli.debug, 2);
    assert!(matches!(cli.command, Some(Commands::Tree { all: true })));
}

#[test]
fn given_config_path_when_parsing_then_selects_subcommand() {
    let cli = Cli::try_parse_from(["systree", "config", "path"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Path
        })
    ));
}

#[rstest]
#[case(&["systree", "level", "minus-one"])]
#[case(&["systree", "get"])]
#[case(&["systree", "find"])]
fn given_bad_arguments_when_parsing_then_fails(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
