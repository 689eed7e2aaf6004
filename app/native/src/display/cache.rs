//! Slot-keyed cache of pane virtual displays.
//!
//! The hosting view's surface comes and goes (rotation, app switches,
//! recomposition) but the app running on the display must survive it, so
//! displays are keyed by a stable slot index and outlive their surfaces.
//!
//! # Thread Safety
//!
//! Each slot has its own lock. Creation, resize, attach, detach and release
//! on one slot never interleave; different slots proceed independently.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::platform::backend::DisplayBackend;
use crate::platform::{
    DisplayFlags, DisplayId, DisplaySpec, INVALID_DISPLAY, PlatformResult, SurfaceHandle,
};

/// State of one pane's virtual display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDisplayInfo {
    pub slot: u32,
    pub display_id: DisplayId,
    pub width: u32,
    pub height: u32,
    pub density: u32,
    pub surface: Option<SurfaceHandle>,
    pub is_active: bool,
}

/// Serializable summary of a cached display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStatus {
    pub slot: u32,
    pub display_id: DisplayId,
    pub width: u32,
    pub height: u32,
    pub density: u32,
    pub active: bool,
}

impl From<&VirtualDisplayInfo> for DisplayStatus {
    fn from(info: &VirtualDisplayInfo) -> Self {
        Self {
            slot: info.slot,
            display_id: info.display_id,
            width: info.width,
            height: info.height,
            density: info.density,
            active: info.is_active,
        }
    }
}

type SlotCell = Arc<Mutex<Option<VirtualDisplayInfo>>>;

/// Slot index to virtual display mapping.
pub struct DisplaySurfaceCache {
    backend: Arc<dyn DisplayBackend>,
    slots: DashMap<u32, SlotCell>,
}

/// Name given to the display of a slot.
#[must_use]
pub fn display_name(slot: u32) -> String { format!("CarrotPlay-PIP-{slot}") }

fn log_failure(slot: u32, display_id: DisplayId, operation: &str, result: PlatformResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) if err.is_stale() => {
            tracing::debug!(slot, display_id, error = %err, "{operation} on stale display ignored");
            false
        }
        Err(err) => {
            tracing::warn!(slot, display_id, error = %err, "{operation} failed");
            false
        }
    }
}

fn usable(surface: Option<&SurfaceHandle>) -> Option<&SurfaceHandle> {
    surface.filter(|s| s.is_valid())
}

impl DisplaySurfaceCache {
    #[must_use]
    pub fn new(backend: Arc<dyn DisplayBackend>) -> Self {
        Self {
            backend,
            slots: DashMap::with_capacity(4),
        }
    }

    fn cell(&self, slot: u32) -> SlotCell {
        Arc::clone(self.slots.entry(slot).or_insert_with(|| Arc::new(Mutex::new(None))).value())
    }

    fn existing_cell(&self, slot: u32) -> Option<SlotCell> {
        self.slots.get(&slot).map(|cell| Arc::clone(cell.value()))
    }

    fn attach_locked(&self, info: &mut VirtualDisplayInfo, surface: &SurfaceHandle) -> bool {
        let attached = log_failure(
            info.slot,
            info.display_id,
            "attach surface",
            self.backend.set_surface(info.display_id, Some(surface)),
        );
        if !attached {
            return false;
        }
        log_failure(info.slot, info.display_id, "power on", self.backend.set_display_power(info.display_id, true));
        info.surface = Some(surface.clone());
        info.is_active = true;
        true
    }

    fn resize_locked(&self, info: &mut VirtualDisplayInfo, width: u32, height: u32, density: u32) -> bool {
        if info.width == width && info.height == height && info.density == density {
            return true;
        }
        let resized = log_failure(
            info.slot,
            info.display_id,
            "resize",
            self.backend.resize_display(info.display_id, width, height, density),
        );
        if resized {
            tracing::debug!(
                slot = info.slot,
                display_id = info.display_id,
                width,
                height,
                density,
                "display resized in place"
            );
            info.width = width;
            info.height = height;
            info.density = density;
        }
        resized
    }

    /// Returns the slot's display, creating it on first use.
    ///
    /// An existing display is resized in place when the size differs, and
    /// re-attached when a valid surface is supplied. Returns `None` only if
    /// a new display could not be created.
    pub fn get_or_create_display(
        &self,
        slot: u32,
        surface: Option<&SurfaceHandle>,
        width: u32,
        height: u32,
        density: u32,
    ) -> Option<VirtualDisplayInfo> {
        let cell = self.cell(slot);
        let mut guard = cell.lock();
        let surface = usable(surface);

        if let Some(info) = guard.as_mut() {
            self.resize_locked(info, width, height, density);
            if let Some(surface) = surface {
                self.attach_locked(info, surface);
            }
            return Some(info.clone());
        }

        let spec = DisplaySpec {
            name: display_name(slot),
            width,
            height,
            density,
            flags: DisplayFlags::PANE,
        };

        match self.backend.create_display(&spec, surface) {
            Ok(display_id) => {
                tracing::info!(slot, display_id, width, height, density, "virtual display created");
                if surface.is_some() {
                    log_failure(slot, display_id, "power on", self.backend.set_display_power(display_id, true));
                }
                let info = VirtualDisplayInfo {
                    slot,
                    display_id,
                    width,
                    height,
                    density,
                    surface: surface.cloned(),
                    is_active: surface.is_some(),
                };
                *guard = Some(info.clone());
                Some(info)
            }
            Err(err) => {
                tracing::warn!(slot, error = %err, "failed to create virtual display");
                None
            }
        }
    }

    /// Points an existing display at a new surface and powers it on.
    ///
    /// Invalid surfaces and unknown slots are ignored.
    pub fn attach_surface(&self, slot: u32, surface: &SurfaceHandle) -> bool {
        if !surface.is_valid() {
            tracing::debug!(slot, "ignoring invalid surface");
            return false;
        }
        let Some(cell) = self.existing_cell(slot) else {
            return false;
        };
        let mut guard = cell.lock();
        guard.as_mut().is_some_and(|info| self.attach_locked(info, surface))
    }

    /// Powers the display off and drops its surface, keeping the display.
    ///
    /// Idempotent. Returns `false` only for unknown slots.
    pub fn detach_surface(&self, slot: u32) -> bool {
        let Some(cell) = self.existing_cell(slot) else {
            return false;
        };
        let mut guard = cell.lock();
        let Some(info) = guard.as_mut() else {
            return false;
        };
        if !info.is_active && info.surface.is_none() {
            return true;
        }

        log_failure(slot, info.display_id, "power off", self.backend.set_display_power(info.display_id, false));
        log_failure(slot, info.display_id, "detach surface", self.backend.set_surface(info.display_id, None));
        info.surface = None;
        info.is_active = false;
        tracing::debug!(slot, display_id = info.display_id, "surface detached, display kept");
        true
    }

    /// Resizes an existing display in place.
    pub fn resize(&self, slot: u32, width: u32, height: u32, density: u32) -> bool {
        let Some(cell) = self.existing_cell(slot) else {
            return false;
        };
        let mut guard = cell.lock();
        guard.as_mut().is_some_and(|info| self.resize_locked(info, width, height, density))
    }

    /// Destroys the slot's display. The only way a display goes away.
    pub fn release_display(&self, slot: u32) -> bool {
        let Some(cell) = self.existing_cell(slot) else {
            return false;
        };
        let mut guard = cell.lock();
        let Some(info) = guard.take() else {
            return false;
        };
        log_failure(slot, info.display_id, "release", self.backend.release_display(info.display_id));
        tracing::info!(slot, display_id = info.display_id, "virtual display released");
        true
    }

    /// Releases every display.
    pub fn release_all(&self) {
        for slot in self.slots() {
            self.release_display(slot);
        }
    }

    /// The slot's display id, if it has one.
    #[must_use]
    pub fn display_id(&self, slot: u32) -> Option<DisplayId> {
        self.info(slot).map(|info| info.display_id)
    }

    /// The slot's display id, or [`INVALID_DISPLAY`].
    #[must_use]
    pub fn display_id_or_invalid(&self, slot: u32) -> DisplayId {
        self.display_id(slot).unwrap_or(INVALID_DISPLAY)
    }

    #[must_use]
    pub fn info(&self, slot: u32) -> Option<VirtualDisplayInfo> {
        self.existing_cell(slot)?.lock().clone()
    }

    /// Slots that currently own a display, in ascending order.
    #[must_use]
    pub fn slots(&self) -> Vec<u32> {
        let cells: Vec<(u32, SlotCell)> =
            self.slots.iter().map(|entry| (*entry.key(), Arc::clone(entry.value()))).collect();
        let mut slots: Vec<u32> =
            cells.into_iter().filter(|(_, cell)| cell.lock().is_some()).map(|(slot, _)| slot).collect();
        slots.sort_unstable();
        slots
    }

    #[must_use]
    pub fn status(&self) -> Vec<DisplayStatus> {
        self.slots().into_iter().filter_map(|slot| self.info(slot)).map(|info| DisplayStatus::from(&info)).collect()
    }

    /// Logs one line per cached display.
    pub fn log_status(&self) {
        let status = self.status();
        tracing::debug!(count = status.len(), "display cache status");
        for entry in status {
            tracing::debug!(
                slot = entry.slot,
                display_id = entry.display_id,
                width = entry.width,
                height = entry.height,
                density = entry.density,
                active = entry.active,
                "cached display"
            );
        }
    }
}
