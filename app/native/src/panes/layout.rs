//! Horizontal split geometry.
//!
//! Panes sit side by side, separated by fixed-width dividers. The ratio
//! sizes the first pane; the remaining width is shared evenly by the
//! others, with the last pane absorbing rounding.

use smallvec::SmallVec;

/// Pane widths, left to right.
pub type PaneWidths = SmallVec<[u32; 3]>;

/// Width left for panes once the dividers are taken out.
#[must_use]
pub fn available_width(container_width: u32, pane_count: usize, divider_width: u32) -> u32 {
    let dividers = u32::try_from(pane_count.saturating_sub(1)).unwrap_or(u32::MAX);
    container_width.saturating_sub(divider_width.saturating_mul(dividers))
}

/// Splits `container_width` into `pane_count` pane widths.
///
/// For two panes: `left = floor(available * ratio)`, `right = available - left`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn pane_widths(container_width: u32, pane_count: usize, divider_width: u32, ratio: f32) -> PaneWidths {
    let mut widths = PaneWidths::new();
    if pane_count == 0 {
        return widths;
    }

    let available = available_width(container_width, pane_count, divider_width);
    if pane_count == 1 {
        widths.push(available);
        return widths;
    }

    let first = ((available as f32) * ratio.clamp(0.0, 1.0)).floor() as u32;
    let first = first.min(available);
    widths.push(first);

    let rest = available - first;
    let others = u32::try_from(pane_count - 1).unwrap_or(u32::MAX);
    let share = rest / others;
    for _ in 1..pane_count - 1 {
        widths.push(share);
    }
    widths.push(rest - share * (others - 1));
    widths
}

/// Left edge of each pane, accounting for dividers.
#[must_use]
pub fn pane_offsets(widths: &[u32], divider_width: u32) -> PaneWidths {
    let mut x = 0u32;
    widths
        .iter()
        .map(|width| {
            let left = x;
            x = x.saturating_add(*width).saturating_add(divider_width);
            left
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_panes_split_on_ratio() {
        let widths = pane_widths(1008, 2, 8, 0.5);
        assert_eq!(widths.as_slice(), &[500, 500]);

        let widths = pane_widths(1008, 2, 8, 0.25);
        assert_eq!(widths.as_slice(), &[250, 750]);
    }

    #[test]
    fn test_two_panes_floor_the_left_width() {
        let widths = pane_widths(1009, 2, 8, 0.5);
        assert_eq!(widths.as_slice(), &[500, 501]);
        assert_eq!(widths.iter().sum::<u32>(), 1001);
    }

    #[test]
    fn test_three_panes_share_the_remainder() {
        let widths = pane_widths(1216, 3, 8, 0.5);
        assert_eq!(widths.as_slice(), &[600, 300, 300]);

        let widths = pane_widths(1217, 3, 8, 0.5);
        assert_eq!(widths.iter().sum::<u32>(), 1201);
        assert_eq!(widths[1], 300);
        assert_eq!(widths[2], 301);
    }

    #[test]
    fn test_narrow_container_does_not_underflow() {
        let widths = pane_widths(4, 2, 8, 0.5);
        assert_eq!(widths.as_slice(), &[0, 0]);
        assert_eq!(available_width(4, 3, 8), 0);
    }

    #[test]
    fn test_offsets_skip_dividers() {
        let offsets = pane_offsets(&[500, 300, 300], 8);
        assert_eq!(offsets.as_slice(), &[0, 508, 816]);
    }
}
