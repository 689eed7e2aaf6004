//! `carrotplay` argument parsing and dispatch.
//!
//! Each subcommand group lives in its own module: `app` drives the tracker,
//! `input` injects events, `tasks` and `watch` observe the task stack,
//! `system` reports capabilities and `config_cmd` manages the config file.

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::CarrotError;
use crate::{config, schema};

pub mod app;
pub mod config_cmd;
pub mod input;
pub mod system;
pub mod tasks;
pub mod watch;

pub use app::AppCommands;
pub use config_cmd::ConfigCommands;
pub use input::InputCommands;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `CarrotPlay` CLI - drive virtual displays, apps and input on a rooted head unit.
#[derive(Parser, Debug)]
#[command(name = "carrotplay")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Read configuration from this JSONC file instead of searching for one.
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Enable debug logging.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Detect which provider serves each capability.
    ///
    /// Probes the elevated shell and reports whether displays, input and
    /// task management are available.
    Caps {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Run a command through the elevated shell.
    ///
    /// Prints the command's output. A non-zero exit status is reported as
    /// an error.
    #[command(after_long_help = r#"Examples:
  carrotplay exec id
  carrotplay exec -- am stack list"#)]
    Exec {
        /// The command and its arguments.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Inject input into a display.
    #[command(subcommand)]
    Input(InputCommands),

    /// Launch, stop and inspect apps on displays.
    #[command(subcommand)]
    App(AppCommands),

    /// List tasks and the display each one runs on.
    Tasks {
        /// Only show tasks on this display.
        #[arg(long, short)]
        display: Option<i32>,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Print foreground app changes as they happen.
    ///
    /// Runs the task tracker on the polling listener until interrupted.
    Watch {
        /// Polling interval in milliseconds.
        #[arg(long, short, value_name = "MS")]
        interval: Option<u64>,

        /// Output one JSON object per notification.
        #[arg(long, short)]
        json: bool,
    },

    /// Create, locate or print the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print the JSON Schema of the configuration file.
    Schema,

    /// Print a completion script for a shell.
    #[command(after_long_help = r#"Examples:
  eval "$(carrotplay completions --shell zsh)"
  carrotplay completions --shell fish > ~/.config/fish/completions/carrotplay.fish"#)]
    Completions {
        /// Target shell.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// The `--config` path with `~` expanded.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_ref().map(|path| config::expand_path(std::path::Path::new(path)))
    }

    /// Runs the parsed subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a missing file or the
    /// subcommand fails.
    pub fn execute(&self) -> Result<(), CarrotError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(CarrotError::ConfigError(format!("no config file at {}", path.display())));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Caps { json } => system::execute_caps(*json),
            Commands::Exec { command } => system::execute_exec(command),
            Commands::Input(cmd) => input::execute(cmd),
            Commands::App(cmd) => app::execute(cmd),
            Commands::Tasks { display, json } => tasks::execute(*display, *json),
            Commands::Watch { interval, json } => watch::execute(*interval, *json),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn into_command(self) -> Commands { self.command }

    fn print_completions<G: Generator>(shell: G) {
        generate(shell, &mut Self::command(), "carrotplay", &mut io::stdout());
    }
}
