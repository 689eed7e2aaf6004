//! `carrotplay config` subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output::print_json;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, config_paths};
use crate::error::CarrotError;

#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Write the commented template with pane, divider, tracker and shell defaults.
    #[command(after_long_help = r#"Examples:
  carrotplay config init
  carrotplay config init --path /sdcard/carrotplay.jsonc
  carrotplay config init --stdout > carrot.jsonc"#)]
    Init {
        /// Replace a file that is already there.
        #[arg(long, short)]
        force: bool,

        /// Where to write; the first search path when omitted.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the template instead of writing it.
        #[arg(long)]
        stdout: bool,
    },

    /// List the config search paths and mark the one in use.
    Path,

    /// Print the effective configuration, defaults included.
    Show,
}

/// Runs a `config` subcommand.
///
/// # Errors
///
/// Returns an error if the template cannot be written or the loaded
/// configuration cannot be serialized.
pub fn execute(cmd: &ConfigCommands) -> Result<(), CarrotError> {
    match cmd {
        ConfigCommands::Init { stdout: true, .. } => {
            println!("{}", generate_config_template());
            Ok(())
        }
        ConfigCommands::Init { force, path, .. } => init_config(*force, path.clone()),
        ConfigCommands::Path => {
            print_search_paths();
            Ok(())
        }
        ConfigCommands::Show => show_config(),
    }
}

fn default_config_path() -> PathBuf {
    config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
}

fn init_config(force: bool, target: Option<PathBuf>) -> Result<(), CarrotError> {
    let path = target.map_or_else(default_config_path, |path| config::expand_path(&path));

    if path.exists() && !force {
        return Err(CarrotError::ConfigError(format!(
            "{} already exists (pass --force to replace it)",
            path.display()
        )));
    }

    create_config_file(&path)
        .map_err(|e| CarrotError::ConfigError(format!("cannot write {}: {e}", path.display())))?;

    println!("{} {}", "Wrote".green(), path.display());
    println!("{}", "Every option is commented out; uncomment what you want to change.".dimmed());
    Ok(())
}

/// Marks the first existing path, which is the one `config::init` loads.
fn search_path_lines(paths: &[PathBuf], exists: impl Fn(&PathBuf) -> bool) -> (Vec<String>, bool) {
    let mut active = false;
    let lines = paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let marker = match (exists(path), active) {
                (true, false) => {
                    active = true;
                    format!(" {}", "(active)".green())
                }
                (true, true) => format!(" {}", "(shadowed)".dimmed()),
                (false, _) => String::new(),
            };
            format!("  {}. {}{marker}", index + 1, path.display())
        })
        .collect();
    (lines, active)
}

fn print_search_paths() {
    println!("Config search order:");
    let (lines, active) = search_path_lines(&config_paths(), |path| path.exists());
    for line in lines {
        println!("{line}");
    }
    if !active {
        println!("{}", "No config file yet; `carrotplay config init` creates one.".dimmed());
    }
}

/// Print the loaded configuration as JSON.
fn show_config() -> Result<(), CarrotError> {
    let config = config::init();
    match config::get_config_path() {
        Some(path) => eprintln!("{}", format!("Loaded from {}", path.display()).dimmed()),
        None => eprintln!("{}", "No configuration file found; showing defaults".dimmed()),
    }
    print_json(&serde_json::to_value(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_lines_mark_first_existing_file() {
        colored::control::set_override(false);
        let paths = vec![PathBuf::from("/a.jsonc"), PathBuf::from("/b.jsonc"), PathBuf::from("/c.jsonc")];
        let (lines, active) = search_path_lines(&paths, |path| path != &paths[0]);
        assert!(active);
        assert_eq!(lines, vec!["  1. /a.jsonc", "  2. /b.jsonc (active)", "  3. /c.jsonc (shadowed)"]);

        let (lines, active) = search_path_lines(&paths, |_| false);
        assert!(!active);
        assert_eq!(lines[2], "  3. /c.jsonc");
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        std::fs::write(&path, "{}").unwrap();

        let err = init_config(false, Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_init_config_writes_template_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        init_config(false, Some(path.clone())).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_config_template());

        init_config(true, Some(path)).unwrap();
    }
}
