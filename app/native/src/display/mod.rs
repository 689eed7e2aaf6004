//! Pane virtual displays.

pub mod cache;
#[cfg(test)]
pub(crate) mod fake;

pub use cache::{DisplayStatus, DisplaySurfaceCache, VirtualDisplayInfo, display_name};
