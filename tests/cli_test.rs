//! Tests for CLI argument parsing and error mapping

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use edgetree::application::{InputFormat, OutputFormat};
use edgetree::cli::args::{Commands, ConfigCommands};
use edgetree::cli::commands::execute_command;
use edgetree::cli::{Cli, CliError};
use edgetree::config::Settings;
use edgetree::domain::CycleCheck;
use edgetree::exitcode;

#[test]
fn given_build_flags_when_parsing_then_fills_options() {
    let cli = Cli::try_parse_from([
        "edgetree",
        "-dd",
        "build",
        "edges.txt",
        "--format",
        "json",
        "--input-format",
        "text",
        "--cycle-check",
        "node-count",
        "--root-marker",
        "ROOT",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Build {
            file,
            format,
            options,
        }) => {
            assert_eq!(file, Some(PathBuf::from("edges.txt")));
            assert_eq!(format, Some(OutputFormat::Json));

            let mut settings = Settings::default();
            options.apply(&mut settings);
            assert_eq!(settings.input, InputFormat::Text);
            assert_eq!(settings.cycle_check, CycleCheck::NodeCount);
            assert_eq!(settings.root_marker, "ROOT");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_unknown_cycle_check_when_parsing_then_rejects() {
    let result = Cli::try_parse_from(["edgetree", "check", "--cycle-check", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn given_config_init_when_parsing_then_reads_flags() {
    let cli = Cli::try_parse_from(["edgetree", "config", "init", "--force"]).unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Init {
                global: false,
                force: true
            }
        })
    ));
}

#[test]
fn given_no_command_when_executing_then_is_usage_error() {
    let cli = Cli::try_parse_from(["edgetree"]).unwrap();

    let err = execute_command(&cli).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_missing_config_dir_when_executing_then_is_invalid_args() {
    let cli = Cli::try_parse_from([
        "edgetree",
        "-C",
        "/nonexistent/config/dir",
        "check",
        "tests/resources/edges/hierarchy.txt",
    ])
    .unwrap();

    let err = execute_command(&cli).unwrap_err();

    assert!(matches!(err, CliError::InvalidArgs(_)));
}

/// Parse `check <file>` with every input setting pinned on the command line and
/// the global config directory redirected to `xdg`.
fn pinned_check(xdg: &Path, local: &Path, file: &str) -> Cli {
    std::env::set_var("XDG_CONFIG_HOME", xdg);
    Cli::try_parse_from([
        "edgetree",
        "-C",
        local.to_str().unwrap(),
        "check",
        file,
        "--cycle-check",
        "strict",
        "--input-format",
        "text",
        "--root-marker",
        "-",
    ])
    .unwrap()
}

#[test]
fn given_loop_file_when_checking_then_exits_with_data_error() {
    let xdg = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    let cli = pinned_check(xdg.path(), local.path(), "tests/resources/edges/loop.txt");

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_lenient_user_config_when_checking_with_flags_then_flags_win() {
    let xdg = TempDir::new().unwrap();
    let global_dir = xdg.path().join("edgetree");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(global_dir.join("edgetree.toml"), "cycle_check = \"off\"\n").unwrap();
    let local = TempDir::new().unwrap();
    fs::write(local.path().join(".edgetree.toml"), "input = \"json\"\n").unwrap();
    std::env::set_var("EDGETREE_CYCLE_CHECK", "off");

    let cli = pinned_check(xdg.path(), local.path(), "tests/resources/edges/loop.txt");
    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(err.to_string().contains("cycle detected"));
}
