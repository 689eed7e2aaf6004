//! Foreground watch command.
//!
//! Runs the tracker with a live task listener and prints every foreground
//! change until the process is interrupted.

use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::context::CliContext;
use crate::cli::output::notification_line;
use crate::config::TrackerConfig;
use crate::error::CarrotError;

/// Returns the tracker configuration with the polling interval overridden.
fn tracker_config(base: &TrackerConfig, interval: Option<u64>) -> TrackerConfig {
    let mut config = base.clone();
    if let Some(ms) = interval {
        config.poll_interval_ms = ms;
    }
    config
}

/// Watches foreground changes.
///
/// # Errors
///
/// Returns an error if no elevated shell is available or the runtime could
/// not be created.
pub fn execute(interval: Option<u64>, json: bool) -> Result<(), CarrotError> {
    let ctx = CliContext::new();
    let config = tracker_config(&ctx.config().tracker, interval);

    let runtime = CliContext::runtime()?;
    runtime.block_on(watch(&ctx, config, json))
}

async fn watch(ctx: &CliContext, config: TrackerConfig, json: bool) -> Result<(), CarrotError> {
    let interval_ms = config.poll_interval_ms;
    let tracker = ctx.tracker(config, false)?;
    let mut notifications = tracker.notifications();

    if !json {
        println!("{}", format!("Watching foreground apps (polling every {interval_ms} ms)").dimmed());
    }

    loop {
        match notifications.recv().await {
            Ok(notification) => {
                if json {
                    println!("{}", serde_json::to_string(&notification)?);
                } else {
                    println!("{}", notification_line(&notification));
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification stream lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackerNotification;

    #[test]
    fn test_tracker_config_overrides_interval() {
        let base = TrackerConfig::default();
        assert_eq!(tracker_config(&base, Some(250)).poll_interval_ms, 250);
        assert_eq!(tracker_config(&base, None).poll_interval_ms, base.poll_interval_ms);
    }

    #[test]
    fn test_notification_json_shape() {
        let json = serde_json::to_value(TrackerNotification::AppClosed { display_id: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "appClosed", "displayId": 4 }));
    }
}
