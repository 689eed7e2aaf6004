//! Mapping touches on a pane's view into its virtual display.

use crate::platform::{Pointer, PointerCoords, Pointers};

/// View-to-display transform for one pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchMapping {
    scale_x: f32,
    scale_y: f32,
    offset_x: f32,
    offset_y: f32,
    /// Multiplier for touch and tool axes reported in density-independent units.
    density: f32,
}

impl TouchMapping {
    /// Maps a `view_width` x `view_height` view onto a display of the given size.
    ///
    /// A degenerate view size maps one to one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Display sizes are far below f32 precision limits
    pub fn new(view_size: (f32, f32), display_size: (u32, u32), density: f32) -> Self {
        let scale = |view: f32, display: u32| {
            if view > 0.0 && display > 0 { display as f32 / view } else { 1.0 }
        };
        Self {
            scale_x: scale(view_size.0, display_size.0),
            scale_y: scale(view_size.1, display_size.1),
            offset_x: 0.0,
            offset_y: 0.0,
            density,
        }
    }

    /// Adds a fixed offset applied after scaling.
    #[must_use]
    pub const fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    #[must_use]
    pub fn map_coords(&self, coords: &PointerCoords) -> PointerCoords {
        normalize(PointerCoords {
            x: self.offset_x + coords.x * self.scale_x,
            y: self.offset_y + coords.y * self.scale_y,
            touch_major: coords.touch_major * self.density,
            touch_minor: coords.touch_minor * self.density,
            tool_major: coords.tool_major * self.density,
            tool_minor: coords.tool_minor * self.density,
            ..*coords
        })
    }

    #[must_use]
    pub fn map_pointers(&self, pointers: &[Pointer]) -> Pointers {
        pointers
            .iter()
            .map(|pointer| Pointer {
                properties: pointer.properties,
                coords: self.map_coords(&pointer.coords),
            })
            .collect()
    }
}

/// Substitutes unit pressure and size for zero readings.
#[must_use]
#[allow(clippy::float_cmp)] // Exactly zero means the axis was not reported
pub fn normalize(mut coords: PointerCoords) -> PointerCoords {
    if coords.pressure == 0.0 {
        coords.pressure = 1.0;
    }
    if coords.size == 0.0 {
        coords.size = 1.0;
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_view_into_display() {
        let mapping = TouchMapping::new((400.0, 300.0), (800, 600), 1.0);
        let mapped = mapping.map_coords(&PointerCoords::at(100.0, 150.0));
        assert!((mapped.x - 200.0).abs() < f32::EPSILON);
        assert!((mapped.y - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_offset_applies_after_scaling() {
        let mapping = TouchMapping::new((100.0, 100.0), (100, 100), 1.0).with_offset(-10.0, 5.0);
        let mapped = mapping.map_coords(&PointerCoords::at(50.0, 50.0));
        assert!((mapped.x - 40.0).abs() < f32::EPSILON);
        assert!((mapped.y - 55.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_axes_scale_by_density() {
        let mapping = TouchMapping::new((1.0, 1.0), (1, 1), 2.0);
        let coords = PointerCoords {
            touch_major: 3.0,
            tool_minor: 1.5,
            ..PointerCoords::at(0.0, 0.0)
        };
        let mapped = mapping.map_coords(&coords);
        assert!((mapped.touch_major - 6.0).abs() < f32::EPSILON);
        assert!((mapped.tool_minor - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_pressure_and_size_default_to_one() {
        let coords = PointerCoords { pressure: 0.0, size: 0.0, ..PointerCoords::default() };
        let mapped = normalize(coords);
        assert!((mapped.pressure - 1.0).abs() < f32::EPSILON);
        assert!((mapped.size - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_degenerate_view_maps_one_to_one() {
        let mapping = TouchMapping::new((0.0, 0.0), (800, 600), 1.0);
        let mapped = mapping.map_coords(&PointerCoords::at(12.0, 34.0));
        assert!((mapped.x - 12.0).abs() < f32::EPSILON);
        assert!((mapped.y - 34.0).abs() < f32::EPSILON);
    }
}
