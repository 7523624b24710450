//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/edgetree/edgetree.toml`
//! 3. Local config: `<dir>/.edgetree.toml` (usually the working directory)
//! 4. Environment variables: `EDGETREE_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::parser::DEFAULT_ROOT_MARKER;
use crate::application::{ApplicationError, InputFormat, OutputFormat};
use crate::domain::CycleCheck;

/// Unified configuration for edgetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Cycle verification strategy
    pub cycle_check: CycleCheck,
    /// Default output format
    pub output: OutputFormat,
    /// Default input format
    pub input: InputFormat,
    /// Token marking an absent parent in text edge lists
    pub root_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cycle_check: CycleCheck::default(),
            output: OutputFormat::default(),
            input: InputFormat::default(),
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so that an overlay only replaces what it specifies.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub cycle_check: Option<CycleCheck>,
    pub output: Option<OutputFormat>,
    pub input: Option<InputFormat>,
    pub root_marker: Option<String>,
}

/// Get the XDG config directory for edgetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "edgetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("edgetree.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".edgetree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where it is Some.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            cycle_check: overlay.cycle_check.unwrap_or(self.cycle_check),
            output: overlay.output.unwrap_or(self.output),
            input: overlay.input.unwrap_or(self.input),
            root_marker: overlay
                .root_marker
                .clone()
                .unwrap_or_else(|| self.root_marker.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.edgetree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/edgetree/edgetree.toml`
    /// 3. Local config: `<local_dir>/.edgetree.toml`
    /// 4. Environment variables: `EDGETREE_*` prefix
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        let current = Self::load_files(global.as_deref(), local_dir)?;
        Self::apply_env_overrides(current)
    }

    /// Defaults merged with the given global file and local directory, no env vars.
    ///
    /// Missing files are skipped; unreadable or malformed ones are errors.
    pub fn load_files(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!(?global_path, "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(?local_path, "loading local config");
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        Ok(current)
    }

    /// Apply EDGETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("EDGETREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<CycleCheck>("cycle_check") {
            settings.cycle_check = val;
        }
        if let Ok(val) = config.get::<OutputFormat>("output") {
            settings.output = val;
        }
        if let Ok(val) = config.get::<InputFormat>("input") {
            settings.input = val;
        }
        if let Ok(val) = config.get_string("root_marker") {
            settings.root_marker = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# edgetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/edgetree/edgetree.toml
#   Local:  ./.edgetree.toml
#   Env:    EDGETREE_* environment variables (e.g. EDGETREE_CYCLE_CHECK=node-count)

# Cycle verification: "strict" (back-edge walk), "node-count" (legacy count heuristic), "off"
# cycle_check = "strict"

# Output format: "tree", "json", "branches", "roots", "leaves"
# output = "tree"

# Input format: "auto", "text", "json"
# input = "auto"

# Token for an absent parent in text edge lists
# root_marker = "-"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
