// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};
use polystat_grid::PositionedCell;
use polystat_view2d::ViewTransform;

/// Cell count above which culling kicks in.
pub const DEFAULT_THRESHOLD: usize = 1000;

/// Tunables for [`VirtualizationFilter`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VirtualizationConfig {
    /// Cull only when there are more cells than this.
    pub threshold: usize,
    /// Padding around the visible rectangle, in cell radii.
    pub padding_radii: f64,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            padding_radii: 2.0,
        }
    }
}

/// Drops cells outside the current view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualizationFilter {
    config: VirtualizationConfig,
}

impl VirtualizationFilter {
    /// Creates a filter with `config`.
    #[must_use]
    pub fn new(config: VirtualizationConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &VirtualizationConfig {
        &self.config
    }

    /// Returns `true` if `count` cells are enough to cull.
    #[must_use]
    pub fn is_active(&self, count: usize) -> bool {
        count > self.config.threshold
    }

    /// Padded logical rectangle in which cells are kept.
    ///
    /// Returns `None` when the transform cannot be inverted (non-finite or
    /// non-positive zoom, non-finite pan) or the view size is not finite; in
    /// that case nothing should be culled.
    #[must_use]
    pub fn keep_rect(&self, transform: ViewTransform, view_size: Size, radius: f64) -> Option<Rect> {
        if !transform.is_valid() || !view_size.is_finite() {
            return None;
        }
        let padding = if radius.is_finite() {
            (radius * self.config.padding_radii).abs()
        } else {
            0.0
        };
        let rect = transform
            .visible_world_rect(view_size)
            .inflate(padding, padding);
        rect.is_finite().then_some(rect)
    }

    /// Cells worth drawing under `transform`, in input order.
    ///
    /// At or below the threshold every cell is returned.
    #[must_use]
    pub fn cull<'c, 'a>(
        &self,
        cells: &'c [PositionedCell<'a>],
        transform: ViewTransform,
        view_size: Size,
        radius: f64,
    ) -> Vec<&'c PositionedCell<'a>> {
        let mut out = Vec::new();
        self.cull_into(cells, transform, view_size, radius, &mut out);
        out
    }

    /// Like [`cull`](Self::cull), but writes into `out` after clearing it.
    pub fn cull_into<'c, 'a>(
        &self,
        cells: &'c [PositionedCell<'a>],
        transform: ViewTransform,
        view_size: Size,
        radius: f64,
        out: &mut Vec<&'c PositionedCell<'a>>,
    ) {
        out.clear();
        let keep = if self.is_active(cells.len()) {
            self.keep_rect(transform, view_size, radius)
        } else {
            None
        };
        let Some(keep) = keep else {
            out.extend(cells);
            return;
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("cull", cells = cells.len()).entered();

        out.extend(cells.iter().filter(|cell| keep.contains(cell.center)));

        #[cfg(feature = "tracing")]
        tracing::trace!(kept = out.len(), "culled");
    }
}

/// Culls with the default configuration.
///
/// See [`VirtualizationFilter::cull`].
#[must_use]
pub fn cull<'c, 'a>(
    cells: &'c [PositionedCell<'a>],
    transform: ViewTransform,
    view_size: Size,
    radius: f64,
) -> Vec<&'c PositionedCell<'a>> {
    VirtualizationFilter::default().cull(cells, transform, view_size, radius)
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};
    use polystat_grid::{MetricItem, PositionedCell, layout_honeycomb};
    use polystat_view2d::ViewTransform;
    use proptest::prelude::*;

    use super::{VirtualizationConfig, VirtualizationFilter, cull};

    fn items(n: usize) -> Vec<MetricItem> {
        (0..n)
            .map(|i| MetricItem::new(format!("m{i}"), i as f64))
            .collect()
    }

    #[test]
    fn small_inputs_are_untouched() {
        let items = items(1000);
        let cells = layout_honeycomb(&items, Size::new(3000.0, 3000.0), 30.0);
        // Far away from any cell, but at the threshold nothing is culled.
        let transform = ViewTransform::new(1.0, Vec2::new(-1.0e5, -1.0e5));
        let kept = cull(&cells, transform, Size::new(800.0, 600.0), 30.0);
        assert_eq!(kept.len(), cells.len());
        for (a, b) in kept.iter().zip(&cells) {
            assert_eq!(a.center, b.center);
        }
    }

    #[test]
    fn large_inputs_keep_visible_cells_only() {
        let items = items(1500);
        let radius = 20.0;
        let cells = layout_honeycomb(&items, Size::new(2000.0, 2000.0), radius);
        let view = Size::new(400.0, 300.0);
        let transform = ViewTransform::new(1.0, Vec2::new(-800.0, -800.0));
        let kept = cull(&cells, transform, view, radius);
        assert!(!kept.is_empty());
        assert!(kept.len() < cells.len());

        let visible = transform.visible_world_rect(view).inflate(2.0 * radius, 2.0 * radius);
        for cell in &kept {
            assert!(visible.contains(cell.center));
        }
        let dropped = cells.len() - kept.len();
        let outside = cells.iter().filter(|c| !visible.contains(c.center)).count();
        assert_eq!(dropped, outside);
    }

    #[test]
    fn degenerate_transforms_disable_culling() {
        let items = items(1200);
        let cells = layout_honeycomb(&items, Size::new(2000.0, 2000.0), 20.0);
        for zoom in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let kept = cull(&cells, ViewTransform::new(zoom, Vec2::ZERO), Size::new(400.0, 300.0), 20.0);
            assert_eq!(kept.len(), cells.len(), "zoom {zoom}");
        }
    }

    #[test]
    fn cull_into_reuses_buffer() {
        let items = items(1200);
        let cells = layout_honeycomb(&items, Size::new(2000.0, 2000.0), 20.0);
        let filter = VirtualizationFilter::new(VirtualizationConfig {
            threshold: 10,
            ..VirtualizationConfig::default()
        });
        let mut buffer: Vec<&PositionedCell<'_>> = Vec::with_capacity(cells.len());
        filter.cull_into(&cells, ViewTransform::IDENTITY, Size::new(200.0, 200.0), 20.0, &mut buffer);
        let first = buffer.len();
        filter.cull_into(&cells, ViewTransform::IDENTITY, Size::new(200.0, 200.0), 20.0, &mut buffer);
        assert_eq!(buffer.len(), first);
        assert!(buffer.capacity() >= cells.len());
    }

    #[test]
    fn keep_rect_matches_inverse_transform() {
        let filter = VirtualizationFilter::default();
        let rect = filter
            .keep_rect(ViewTransform::new(2.0, Vec2::new(100.0, 50.0)), Size::new(800.0, 600.0), 10.0)
            .unwrap();
        assert_eq!(rect.origin(), Point::new(-50.0 - 20.0, -25.0 - 20.0));
        assert!((rect.width() - (400.0 + 40.0)).abs() < 1e-9);
        assert!((rect.height() - (300.0 + 40.0)).abs() < 1e-9);
        assert!(filter.keep_rect(ViewTransform::new(f64::NAN, Vec2::ZERO), Size::new(1.0, 1.0), 1.0).is_none());
    }

    proptest! {
        #[test]
        fn culled_cells_are_a_subset_in_order(
            n in 0_usize..1600,
            zoom in 0.05_f64..8.0,
            pan_x in -3000.0_f64..3000.0,
            pan_y in -3000.0_f64..3000.0,
        ) {
            let items = items(n);
            let cells = layout_honeycomb(&items, Size::new(2500.0, 2500.0), 12.0);
            let kept = cull(&cells, ViewTransform::new(zoom, Vec2::new(pan_x, pan_y)), Size::new(640.0, 480.0), 12.0);
            prop_assert!(kept.len() <= cells.len());
            // Kept cells appear in input order.
            let mut cursor = 0;
            for cell in kept {
                let pos = cells[cursor..]
                    .iter()
                    .position(|c| core::ptr::eq(c, cell));
                prop_assert!(pos.is_some());
                cursor += pos.unwrap_or(0) + 1;
            }
        }
    }
}
