//! Root configuration type and loading functions.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::input::InputConfig;
use super::panes::{AnimationConfig, DividerConfig, PanesConfig, ResizeConfig};
use super::tracker::{ShellConfig, TrackerConfig};

/// Root configuration structure for `CarrotPlay`.
///
/// Every section is optional; missing values fall back to the defaults the
/// launcher was tuned with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CarrotConfig {
    /// JSON Schema reference for editor support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Pane count and display defaults.
    pub panes: PanesConfig,

    /// Divider gesture and ratio bounds.
    pub divider: DividerConfig,

    /// Animated ratio changes.
    pub animation: AnimationConfig,

    /// Display resize scheduling.
    pub resize: ResizeConfig,

    /// Input synchronization and gestures.
    pub input: InputConfig,

    /// Task tracker timing.
    pub tracker: TrackerConfig,

    /// Elevated shell settings.
    pub shell: ShellConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/carrotplay/config.jsonc \
                or ~/.carrotplay.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".carrotplay.jsonc", ".carrotplay.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/carrotplay/config.jsonc` or `config.json`
/// 2. `~/.config/carrotplay/config.jsonc` or `config.json`
/// 3. The platform config directory (`dirs::config_dir`)
/// 4. `~/.carrotplay.jsonc` or `~/.carrotplay.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let app_dir = PathBuf::from(xdg_config).join("carrotplay");
        for filename in CONFIG_FILE_NAMES {
            paths.push(app_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let app_dir = home.join(".config").join("carrotplay");
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            // XDG_CONFIG_HOME is often ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("carrotplay");
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(CarrotConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// A leading `~` and environment variables in the path are expanded.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, and the
/// other variants for read and parse failures.
pub fn load_config_from_path(path: &PathBuf) -> Result<(CarrotConfig, PathBuf), ConfigError> {
    let path = expand_path(path);
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(&path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: CarrotConfig = serde_json::from_reader(reader)?;
    Ok((config, path))
}

/// Expands `~` and `$VAR` references in a user-supplied path.
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
