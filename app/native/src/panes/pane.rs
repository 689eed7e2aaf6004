//! One pane: a slot-backed virtual display plus the app running on it.
//!
//! The pane never owns its display. Displays live in the shared
//! [`DisplaySurfaceCache`] keyed by slot, so disposing a pane (or losing
//! its surface) keeps the app alive; only [`PaneHandle::release`] destroys
//! the display.
//!
//! Every interaction degrades silently: failures return `false` and are
//! logged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::resize::{ResizeRequest, ResizeScheduler};
use crate::display::DisplaySurfaceCache;
use crate::input::{InputRouter, TouchMapping};
use crate::platform::{
    DisplayId, INVALID_DISPLAY, LaunchRequest, MotionAction, Pointer, SurfaceHandle, TaskBackend,
    WindowingMode, intent_flags,
};
use crate::tracker::{TrackerHandle, TrackerNotification};

/// Callback fired with the display id once the pane's display is ready.
pub type DisplayReadyCallback = Box<dyn FnMut(DisplayId) + Send>;

/// How a pane starts apps on its display.
#[derive(Clone)]
pub enum AppLauncher {
    /// Through the tracker, which records the pending launch and focuses it.
    Tracker(TrackerHandle),
    /// Straight through a task backend, typically the shell provider.
    Direct(Arc<dyn TaskBackend>),
}

impl fmt::Debug for AppLauncher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracker(_) => f.write_str("AppLauncher::Tracker"),
            Self::Direct(_) => f.write_str("AppLauncher::Direct"),
        }
    }
}

impl AppLauncher {
    /// Starts `package` on `display_id`.
    pub async fn launch(&self, package: &str, display_id: DisplayId) -> bool {
        match self {
            Self::Tracker(tracker) => tracker
                .launch_on_display(package, display_id)
                .await
                .inspect_err(|err| tracing::warn!(package, display_id, error = %err, "tracker launch failed"))
                .unwrap_or(false),
            Self::Direct(backend) => {
                let backend = Arc::clone(backend);
                let package = package.to_string();
                tokio::task::spawn_blocking(move || launch_direct(backend.as_ref(), &package, display_id))
                    .await
                    .unwrap_or(false)
            }
        }
    }
}

fn launch_direct(backend: &dyn TaskBackend, package: &str, display_id: DisplayId) -> bool {
    let component = match backend.resolve_launcher_activity(package) {
        Ok(Some(component)) => component,
        Ok(None) => {
            tracing::warn!(package, "no launcher activity found");
            return false;
        }
        Err(err) => {
            tracing::warn!(package, error = %err, "failed to resolve launcher activity");
            return false;
        }
    };
    let request = LaunchRequest {
        component,
        display_id,
        windowing_mode: WindowingMode::Fullscreen,
        flags: intent_flags::PANE_LAUNCH,
    };
    backend
        .start_activity(&request)
        .inspect(|_| tracing::info!(package, display_id, "app launch initiated"))
        .inspect_err(|err| tracing::warn!(package, display_id, error = %err, "failed to launch app"))
        .is_ok()
}

/// Shared services every pane talks to.
#[derive(Clone)]
pub struct PaneServices {
    pub cache: Arc<DisplaySurfaceCache>,
    pub launcher: Option<AppLauncher>,
    pub input: Option<Arc<dyn InputRouter>>,
    pub resizer: ResizeScheduler,
}

/// One side-by-side pane.
pub struct PaneHandle {
    index: usize,
    slot: u32,
    services: PaneServices,
    width: u32,
    height: u32,
    density: u32,
    display_id: DisplayId,
    current_package: Option<String>,
    ready_retry: Duration,
    on_display_ready: Option<DisplayReadyCallback>,
}

impl fmt::Debug for PaneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaneHandle")
            .field("index", &self.index)
            .field("slot", &self.slot)
            .field("display_id", &self.display_id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("current_package", &self.current_package)
            .finish_non_exhaustive()
    }
}

impl PaneHandle {
    #[must_use]
    pub const fn new(index: usize, slot: u32, density: u32, ready_retry: Duration, services: PaneServices) -> Self {
        Self {
            index,
            slot,
            services,
            width: 0,
            height: 0,
            density,
            display_id: INVALID_DISPLAY,
            current_package: None,
            ready_retry,
            on_display_ready: None,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize { self.index }

    #[must_use]
    pub const fn slot(&self) -> u32 { self.slot }

    #[must_use]
    pub const fn display_id(&self) -> DisplayId { self.display_id }

    #[must_use]
    pub fn current_package(&self) -> Option<&str> { self.current_package.as_deref() }

    #[must_use]
    pub const fn size(&self) -> (u32, u32) { (self.width, self.height) }

    #[must_use]
    pub const fn density(&self) -> u32 { self.density }

    pub fn set_on_display_ready(&mut self, callback: impl FnMut(DisplayId) + Send + 'static) {
        self.on_display_ready = Some(Box::new(callback));
    }

    // ========================================================================
    // Surface lifecycle
    // ========================================================================

    /// Creates the slot's display, or re-attaches the existing one, and
    /// fires the display-ready callback.
    pub fn surface_ready(&mut self, surface: &SurfaceHandle, width: u32, height: u32) -> Option<DisplayId> {
        self.width = width;
        self.height = height;
        let Some(info) =
            self.services.cache.get_or_create_display(self.slot, Some(surface), width, height, self.density)
        else {
            tracing::warn!(pane = self.index, slot = self.slot, "pane display unavailable");
            return None;
        };

        self.display_id = info.display_id;
        tracing::debug!(pane = self.index, slot = self.slot, display_id = info.display_id, "pane display ready");
        if let Some(callback) = self.on_display_ready.as_mut() {
            callback(info.display_id);
        }
        Some(info.display_id)
    }

    /// Drops the surface; the display and its app keep running.
    pub fn surface_destroyed(&mut self) -> bool {
        tracing::debug!(pane = self.index, slot = self.slot, "pane surface destroyed");
        self.services.cache.detach_surface(self.slot)
    }

    /// Teardown without closing the app: detaches the surface.
    pub fn dispose(&mut self) {
        self.surface_destroyed();
        self.on_display_ready = None;
    }

    /// Permanently closes the pane's display.
    pub fn release(&mut self) -> bool {
        let released = self.services.cache.release_display(self.slot);
        if released {
            tracing::info!(pane = self.index, slot = self.slot, display_id = self.display_id, "pane display released");
        }
        self.display_id = INVALID_DISPLAY;
        self.current_package = None;
        self.on_display_ready = None;
        released
    }

    /// Resizes the pane and schedules the display resize.
    pub fn resize(&mut self, width: u32, height: u32, density: u32) {
        if (width, height, density) == (self.width, self.height, self.density) {
            return;
        }
        self.set_size(width, height);
        self.density = density;
        if self.ready_display().is_some() {
            self.schedule_resize();
        }
    }

    pub(crate) const fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub(crate) const fn resize_request(&self) -> ResizeRequest {
        ResizeRequest { slot: self.slot, width: self.width, height: self.height, density: self.density }
    }

    pub(crate) fn schedule_resize(&self) { self.services.resizer.request(self.resize_request()); }

    fn ready_display(&mut self) -> Option<DisplayId> {
        let display_id = self.services.cache.display_id(self.slot).filter(|id| *id != INVALID_DISPLAY)?;
        self.display_id = display_id;
        Some(display_id)
    }

    // ========================================================================
    // Apps
    // ========================================================================

    /// Launches `package` on this pane's display.
    ///
    /// A display that is not ready yet gets one more chance after the
    /// ready-retry delay.
    pub async fn launch_app(&mut self, package: &str) -> bool {
        let display_id = match self.ready_display() {
            Some(display_id) => display_id,
            None => {
                tracing::debug!(pane = self.index, slot = self.slot, package, "display not ready, retrying launch");
                tokio::time::sleep(self.ready_retry).await;
                let Some(display_id) = self.ready_display() else {
                    tracing::warn!(pane = self.index, slot = self.slot, package, "display never became ready");
                    return false;
                };
                display_id
            }
        };

        let Some(launcher) = self.services.launcher.clone() else {
            tracing::warn!(pane = self.index, package, "no launcher available");
            return false;
        };

        let launched = launcher.launch(package, display_id).await;
        if launched {
            self.current_package = Some(package.to_string());
        }
        launched
    }

    /// Applies a tracker notification addressed to this pane's display.
    pub fn apply_notification(&mut self, notification: &TrackerNotification) -> bool {
        if self.display_id == INVALID_DISPLAY {
            return false;
        }
        match notification {
            TrackerNotification::AppChanged { display_id, package } if *display_id == self.display_id => {
                self.current_package = Some(package.clone());
                true
            }
            TrackerNotification::AppClosed { display_id } if *display_id == self.display_id => {
                self.current_package = None;
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Forwards a touch given in pane-local view coordinates.
    #[allow(clippy::cast_precision_loss)]
    pub fn forward_touch(&self, action: MotionAction, pointers: &[Pointer]) -> bool {
        let Some((input, display_id)) = self.input_target() else {
            return false;
        };
        let display_size = self
            .services
            .cache
            .info(self.slot)
            .map_or((self.width, self.height), |info| (info.width, info.height));
        let mapping = TouchMapping::new((self.width as f32, self.height as f32), display_size, 1.0);
        input.inject_pointer(display_id, action, &mapping.map_pointers(pointers))
    }

    pub fn send_back_key(&self) -> bool {
        self.input_target().is_some_and(|(input, display_id)| input.send_back(display_id))
    }

    pub fn send_home_key(&self) -> bool {
        self.input_target().is_some_and(|(input, display_id)| input.send_home(display_id))
    }

    fn input_target(&self) -> Option<(&dyn InputRouter, DisplayId)> {
        if self.display_id == INVALID_DISPLAY {
            return None;
        }
        let input = self.services.input.as_deref()?;
        Some((input, self.display_id))
    }
}
