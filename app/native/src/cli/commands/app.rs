//! App CLI commands.
//!
//! Launch, stop and inspect apps on displays through the task tracker.

use clap::Subcommand;
use colored::Colorize;

use crate::cli::context::CliContext;
use crate::error::CarrotError;
use crate::platform::{DEFAULT_DISPLAY, DisplayId};
use crate::shell::commands;
use crate::tracker::TrackerHandle;

/// App management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum AppCommands {
    /// Launch an app on a display.
    ///
    /// Brings an existing task to the display when the app is already
    /// running, otherwise starts its launcher activity there.
    #[command(after_long_help = r#"Examples:
  carrotplay app launch com.spotify.music --display 12
  carrotplay app launch com.waze --display 13 --async"#)]
    Launch {
        /// Package name.
        package: String,

        /// Target display.
        #[arg(long, short)]
        display: DisplayId,

        /// Queue the launch on the persistent shell and return immediately.
        #[arg(long = "async")]
        fire_and_forget: bool,
    },

    /// Move an app fullscreen onto the main display.
    Fullscreen {
        /// Package name.
        package: String,

        /// Display the app is currently shown on.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Force-stop an app.
    Stop {
        /// Package name.
        package: String,
    },

    /// Print the package of the visible task on a display.
    Top {
        /// Display to query.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Report whether BACK would stay inside the display's app.
    CanGoBack {
        /// Display to query.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Remove every task on a display.
    Clear {
        /// Display to clear.
        #[arg(long, short)]
        display: DisplayId,
    },

    /// Send the display's app to the background.
    Background {
        /// Display whose app is backgrounded.
        #[arg(long, short)]
        display: DisplayId,
    },
}

/// Execute app subcommands.
///
/// # Errors
///
/// Returns an error if the package name is invalid, no elevated shell is
/// available, or the tracker reported failure.
pub fn execute(cmd: &AppCommands) -> Result<(), CarrotError> {
    let ctx = CliContext::new();

    if let AppCommands::Launch { package, display, fire_and_forget: true } = cmd {
        return launch_async(&ctx, package, *display);
    }

    let runtime = CliContext::runtime()?;
    runtime.block_on(run_with_tracker(&ctx, cmd))
}

async fn run_with_tracker(ctx: &CliContext, cmd: &AppCommands) -> Result<(), CarrotError> {
    let tracker = ctx.tracker(ctx.config().tracker.clone(), true)?;
    let result = run(&tracker, cmd).await;
    if let Err(err) = tracker.shutdown().await {
        tracing::debug!(error = %err, "tracker already stopped");
    }
    result
}

async fn run(tracker: &TrackerHandle, cmd: &AppCommands) -> Result<(), CarrotError> {
    match cmd {
        AppCommands::Launch { package, display, .. } => {
            checked(package)?;
            let launched = tracker.launch_on_display(package, *display).await?;
            expect_success(launched, || format!("launch of {package} on display {display} failed"))?;
            println!("Launched {} on display {display}", package.green());
        }
        AppCommands::Fullscreen { package, display } => {
            checked(package)?;
            let launched = tracker.launch_fullscreen_on_main(package, *display).await?;
            expect_success(launched, || format!("fullscreen launch of {package} failed"))?;
            println!("Moved {} to the main display", package.green());
        }
        AppCommands::Stop { package } => {
            checked(package)?;
            let stopped = tracker.force_stop(package).await?;
            expect_success(stopped, || format!("force-stop of {package} failed"))?;
            println!("Stopped {}", package.green());
        }
        AppCommands::Top { display } => match tracker.top_activity(*display).await? {
            Some(package) => println!("{package}"),
            None => println!("{}", format!("No visible task on display {display}").dimmed()),
        },
        AppCommands::CanGoBack { display } => {
            println!("{}", tracker.can_go_back(*display).await?);
        }
        AppCommands::Clear { display } => {
            let cleared = tracker.clear_display_tasks(*display).await?;
            expect_success(cleared, || format!("clearing display {display} failed"))?;
            println!("Cleared display {display}");
        }
        AppCommands::Background { display } => {
            let moved = tracker.send_to_background(*display).await?;
            expect_success(moved, || format!("no task to background on display {display}"))?;
            println!("Backgrounded display {display}");
        }
    }
    Ok(())
}

/// Resolves the launcher activity and queues `am start` on the persistent
/// shell without waiting for it.
fn launch_async(ctx: &CliContext, package: &str, display: DisplayId) -> Result<(), CarrotError> {
    checked(package)?;
    let tasks = ctx.task_backend()?;
    let component = tasks
        .resolve_launcher_activity(package)?
        .ok_or_else(|| CarrotError::TaskError(format!("no launcher activity for {package}")))?;

    let command = commands::start_in_pane(&component, display)?;
    ctx.shell().execute_async(&command)?;
    println!("Queued {} on display {display}", component.to_string().green());
    Ok(())
}

fn checked(package: &str) -> Result<(), CarrotError> {
    commands::checked_package(package)
        .map(|_| ())
        .map_err(|_| CarrotError::InvalidArguments(format!("invalid package name: {package}")))
}

fn expect_success(ok: bool, message: impl FnOnce() -> String) -> Result<(), CarrotError> {
    if ok { Ok(()) } else { Err(CarrotError::TaskError(message())) }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;
    use crate::cli::commands::Commands;

    fn parse(args: &[&str]) -> AppCommands {
        match Cli::try_parse_from(args).unwrap().into_command() {
            Commands::App(cmd) => cmd,
            other => panic!("Expected App command, got {other:?}"),
        }
    }

    #[test]
    fn test_launch_requires_display() {
        assert!(Cli::try_parse_from(["carrotplay", "app", "launch", "com.app.a"]).is_err());
    }

    #[test]
    fn test_launch_parses_async_flag() {
        let cmd = parse(&["carrotplay", "app", "launch", "com.app.a", "-d", "11", "--async"]);
        match cmd {
            AppCommands::Launch { package, display, fire_and_forget } => {
                assert_eq!(package, "com.app.a");
                assert_eq!(display, 11);
                assert!(fire_and_forget);
            }
            other => panic!("Expected Launch, got {other:?}"),
        }
    }

    #[test]
    fn test_can_go_back_uses_kebab_case_name() {
        let cmd = parse(&["carrotplay", "app", "can-go-back", "--display", "3"]);
        assert!(matches!(cmd, AppCommands::CanGoBack { display: 3 }));
    }

    #[test]
    fn test_checked_rejects_shell_metacharacters() {
        assert!(checked("com.app.a").is_ok());
        let err = checked("com.app; reboot").unwrap_err();
        assert!(matches!(err, CarrotError::InvalidArguments(_)));
    }

    #[test]
    fn test_expect_success_maps_false_to_task_error() {
        assert!(expect_success(true, || unreachable!()).is_ok());
        let err = expect_success(false, || "boom".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Task error: boom");
    }
}
