//! In-memory display backend for tests.

use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::Mutex;

use crate::platform::backend::DisplayBackend;
use crate::platform::{DisplayId, DisplaySpec, PlatformError, PlatformResult, SurfaceHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String, u32, u32, u32),
    Resize(DisplayId, u32, u32),
    Surface(DisplayId, Option<u64>),
    Power(DisplayId, bool),
    Release(DisplayId),
}

/// Hands out display ids from 10 upwards and records every call.
#[derive(Default)]
pub struct FakeDisplays {
    pub next_id: AtomicI32,
    pub calls: Mutex<Vec<Call>>,
    pub fail_create: bool,
}

impl FakeDisplays {
    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| matches(call)).count()
    }
}

impl DisplayBackend for FakeDisplays {
    fn probe(&self) -> PlatformResult<()> { Ok(()) }

    fn create_display(&self, spec: &DisplaySpec, _surface: Option<&SurfaceHandle>) -> PlatformResult<DisplayId> {
        if self.fail_create {
            return Err(PlatformError::rejected("create display", "denied"));
        }
        assert_eq!(spec.flags.bits(), 0x409);
        self.calls.lock().push(Call::Create(spec.name.clone(), spec.width, spec.height, spec.density));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 10)
    }

    fn resize_display(&self, id: DisplayId, width: u32, height: u32, _density: u32) -> PlatformResult<()> {
        self.calls.lock().push(Call::Resize(id, width, height));
        Ok(())
    }

    fn set_surface(&self, id: DisplayId, surface: Option<&SurfaceHandle>) -> PlatformResult<()> {
        self.calls.lock().push(Call::Surface(id, surface.map(SurfaceHandle::id)));
        Ok(())
    }

    fn set_display_power(&self, id: DisplayId, on: bool) -> PlatformResult<()> {
        self.calls.lock().push(Call::Power(id, on));
        Ok(())
    }

    fn release_display(&self, id: DisplayId) -> PlatformResult<()> {
        self.calls.lock().push(Call::Release(id));
        Ok(())
    }
}
