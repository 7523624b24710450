//! Command implementations

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ForestService, OutputFormat};
use crate::cli::args::{Cli, Commands, ConfigCommands, InputOptions};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build {
            file,
            format,
            options,
        }) => cmd_build(cli, file.as_deref(), *format, options),
        Some(Commands::Check { file, options }) => cmd_check(cli, file.as_deref(), options),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(cli),
            ConfigCommands::Init { global, force } => cmd_config_init(cli, *global, *force),
            ConfigCommands::Path => cmd_config_path(cli),
        },
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

/// Directory searched for the local config file.
fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        ))),
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| ApplicationError::io("resolve working directory", e).into()),
    }
}

fn load_settings(cli: &Cli, options: &InputOptions) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    options.apply(&mut settings);
    debug!(?settings, "effective settings");
    Ok(settings)
}

#[instrument(skip(cli, options))]
fn cmd_build(
    cli: &Cli,
    file: Option<&Path>,
    format: Option<OutputFormat>,
    options: &InputOptions,
) -> CliResult<()> {
    let mut settings = load_settings(cli, options)?;
    if let Some(format) = format {
        settings.output = format;
    }
    let service = ForestService::new(&settings);
    let rendered = service.render_input(file)?;
    output::data(&rendered);
    Ok(())
}

#[instrument(skip(cli, options))]
fn cmd_check(cli: &Cli, file: Option<&Path>, options: &InputOptions) -> CliResult<()> {
    let settings = load_settings(cli, options)?;
    let service = ForestService::new(&settings);
    let summary = service.check_input(file)?;
    output::success(&format!("{} ({})", summary, settings.cycle_check));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config_show(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli, &InputOptions::default())?;
    output::data(&settings.to_toml()?);
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config_init(cli: &Cli, global: bool, force: bool) -> CliResult<()> {
    let path = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine global config directory".to_string()))?
    } else {
        local_config_path(&config_dir(cli)?)
    };

    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApplicationError::io(format!("create {}", parent.display()), e))?;
    }
    std::fs::write(&path, Settings::template())
        .map_err(|e| ApplicationError::io(format!("write {}", path.display()), e))?;

    output::action("Created", &path.display());
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    output::header("Config paths");
    match global_config_path() {
        Some(path) => output::detail(&format!("global: {}", path.display())),
        None => output::detail("global: <unavailable>"),
    }
    output::detail(&format!(
        "local:  {}",
        local_config_path(&config_dir(cli)?).display()
    ));
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
