//! Input CLI commands.
//!
//! Injects taps, swipes and keys into a display through the elevated shell.

use clap::Subcommand;

use crate::cli::context::CliContext;
use crate::error::CarrotError;
use crate::input::InputRouter;
use crate::platform::{DEFAULT_DISPLAY, DisplayId};

/// Input injection commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum InputCommands {
    /// Tap a point.
    #[command(after_long_help = r#"Examples:
  carrotplay input tap 400 300
  carrotplay input tap 400 300 --display 12"#)]
    Tap {
        /// X coordinate in display pixels.
        x: f32,

        /// Y coordinate in display pixels.
        y: f32,

        /// Target display.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Swipe between two points.
    Swipe {
        /// Start X coordinate.
        x1: f32,

        /// Start Y coordinate.
        y1: f32,

        /// End X coordinate.
        x2: f32,

        /// End Y coordinate.
        y2: f32,

        /// Duration in milliseconds. Defaults to `input.swipeDurationMs`.
        #[arg(long, value_name = "MS")]
        duration: Option<u64>,

        /// Target display.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Press and hold a point.
    LongPress {
        /// X coordinate in display pixels.
        x: f32,

        /// Y coordinate in display pixels.
        y: f32,

        /// Hold duration in milliseconds. Defaults to `input.longPressMs`.
        #[arg(long, value_name = "MS")]
        hold: Option<u64>,

        /// Target display.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Send a key code.
    Key {
        /// Android key code (e.g. 4 for BACK).
        code: i32,

        /// Target display.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Send BACK.
    Back {
        /// Target display.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },

    /// Send HOME.
    Home {
        /// Target display.
        #[arg(long, short, default_value_t = DEFAULT_DISPLAY)]
        display: DisplayId,
    },
}

impl InputCommands {
    const fn display(&self) -> DisplayId {
        match self {
            Self::Tap { display, .. }
            | Self::Swipe { display, .. }
            | Self::LongPress { display, .. }
            | Self::Key { display, .. }
            | Self::Back { display }
            | Self::Home { display } => *display,
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Tap { .. } => "tap",
            Self::Swipe { .. } => "swipe",
            Self::LongPress { .. } => "long-press",
            Self::Key { .. } => "key",
            Self::Back { .. } => "back",
            Self::Home { .. } => "home",
        }
    }
}

/// Execute input subcommands.
///
/// # Errors
///
/// Returns an error if the display id is invalid or the shell rejected the
/// input.
pub fn execute(cmd: &InputCommands) -> Result<(), CarrotError> {
    let display = cmd.display();
    if display < 0 {
        return Err(CarrotError::InvalidArguments(format!("invalid display id: {display}")));
    }

    let ctx = CliContext::new();
    if !ctx.shell().is_root_available() {
        return Err(CarrotError::Unavailable("input injection requires an elevated shell".to_string()));
    }

    if dispatch(ctx.input().as_ref(), cmd, &ctx) {
        Ok(())
    } else {
        Err(CarrotError::InputError(format!("{} on display {display} was not delivered", cmd.name())))
    }
}

fn dispatch(router: &dyn InputRouter, cmd: &InputCommands, ctx: &CliContext) -> bool {
    let input = &ctx.config().input;
    match cmd {
        InputCommands::Tap { x, y, display } => router.tap(*display, *x, *y),
        InputCommands::Swipe { x1, y1, x2, y2, duration, display } => {
            let duration =
                duration.map_or_else(|| input.swipe_duration(), std::time::Duration::from_millis);
            router.swipe(*display, (*x1, *y1), (*x2, *y2), duration, input.swipe_steps)
        }
        InputCommands::LongPress { x, y, hold, display } => {
            let hold = hold.map_or_else(|| input.long_press(), std::time::Duration::from_millis);
            router.long_press(*display, *x, *y, hold)
        }
        InputCommands::Key { code, display } => router.inject_key(*display, *code),
        InputCommands::Back { display } => router.send_back(*display),
        InputCommands::Home { display } => router.send_home(*display),
    }
}
