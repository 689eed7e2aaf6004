//! Configuration types for `CarrotPlay`.
//!
//! This module provides all configuration types organized by domain.
//! The configuration file supports JSONC format (JSON with comments).

pub mod input;
pub mod panes;
pub mod root;
pub mod tracker;

pub use input::InputConfig;
pub use panes::{AnimationConfig, DividerConfig, PanesConfig, ResizeConfig};
pub use root::{
    CarrotConfig, ConfigError, config_paths, expand_path, load_config, load_config_from_path,
};
pub use tracker::{ShellConfig, TrackerConfig};
