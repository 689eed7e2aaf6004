//! `CarrotPlay` - multi-pane virtual display launcher core for Android head units.
//!
//! This library hosts apps side by side on virtual displays, routes touch
//! and key input to them and tracks which app is in the foreground of each
//! display. Every platform capability comes from either a privileged
//! provider supplied by the embedding host or an elevated shell fallback.

// Platform boundary
pub mod platform;
pub mod shell;

// Core modules
pub mod display;
pub mod input;
pub mod panes;
pub mod tracker;

// Application modules
pub mod cli;
pub mod config;
pub mod error;
pub mod schema;
