//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::application::{InputFormat, OutputFormat};
use crate::config::Settings;
use crate::domain::CycleCheck;

/// Build nested forests from parent-child edge lists, with cycle detection
#[derive(Parser, Debug)]
#[command(name = "edgetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .edgetree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the forest and print it
    Build {
        /// Edge list file ("-" or none reads stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        #[command(flatten)]
        options: InputOptions,
    },

    /// Verify the edge list and print a summary
    Check {
        /// Edge list file ("-" or none reads stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[command(flatten)]
        options: InputOptions,
    },

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

/// Flags overriding the input side of the configuration.
#[derive(Args, Debug, Default)]
pub struct InputOptions {
    /// Input format
    #[arg(short, long, value_enum)]
    pub input_format: Option<InputFormat>,
    /// Cycle check strategy
    #[arg(long, value_enum)]
    pub cycle_check: Option<CycleCheck>,
    /// Token marking an absent parent in text input
    #[arg(long)]
    pub root_marker: Option<String>,
}

impl InputOptions {
    /// Apply flags on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(input) = self.input_format {
            settings.input = input;
        }
        if let Some(cycle_check) = self.cycle_check {
            settings.cycle_check = cycle_check;
        }
        if let Some(marker) = &self.root_marker {
            settings.root_marker = marker.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
