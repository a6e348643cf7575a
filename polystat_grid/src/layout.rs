// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Honeycomb packing of an ordered item list into a rectangle.

use core::cmp::Ordering;

use kurbo::{Point, Rect, Size};

use crate::finite_or_zero;
use crate::item::{MetricItem, PositionedCell};

/// Largest container extent, in logical units, accepted by the layout.
pub const MAX_DIMENSION: f64 = 1_000_000.0;

/// `√3`, the ratio between a pointy-top hexagon's width and its radius.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Fraction of the cell height between two interlocked rows.
pub const ROW_SPACING_FACTOR: f64 = 0.75;

/// Columns and rows of a packed honeycomb block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GridDimensions {
    /// Number of columns.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
}

/// Chooses a column/row split for `count` items so that the packed block's
/// aspect ratio stays close to `aspect` (`width / height`).
///
/// `columns = ceil(sqrt(count * aspect))`, `rows = ceil(count / columns)`.
/// A non-finite or non-positive aspect is treated as square.
#[must_use]
pub fn grid_dimensions(count: usize, aspect: f64) -> GridDimensions {
    if count == 0 {
        return GridDimensions::default();
    }
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let ideal = (count as f64 * aspect).sqrt().ceil();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bounded by `count` immediately after"
    )]
    let columns = if ideal.is_finite() {
        (ideal as usize).clamp(1, count)
    } else {
        count
    };
    GridDimensions {
        columns,
        rows: count.div_ceil(columns),
    }
}

/// Size and spacing of a pointy-top hexagon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexMetrics {
    /// Center-to-vertex distance.
    pub radius: f64,
    /// Flat-to-flat width, `radius * √3`; also the column spacing.
    pub width: f64,
    /// Vertex-to-vertex height, `radius * 2`.
    pub height: f64,
    /// Vertical distance between interlocked rows.
    pub row_spacing: f64,
}

impl HexMetrics {
    /// Derives all metrics from a radius.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        let height = radius * 2.0;
        Self {
            radius,
            width: radius * SQRT_3,
            height,
            row_spacing: height * ROW_SPACING_FACTOR,
        }
    }

    /// Size of a block of `dims` cells; odd rows stick out by half a cell.
    #[must_use]
    pub fn block_size(&self, dims: GridDimensions) -> Size {
        if dims.columns == 0 || dims.rows == 0 {
            return Size::ZERO;
        }
        let stagger = if dims.rows > 1 { self.width / 2.0 } else { 0.0 };
        Size::new(
            dims.columns as f64 * self.width + stagger,
            (dims.rows - 1) as f64 * self.row_spacing + self.height,
        )
    }
}

/// Bounds applied to an automatically derived cell radius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RadiusBounds {
    /// Smallest radius handed out.
    pub min: f64,
    /// Largest radius handed out.
    pub max: f64,
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self {
            min: 4.0,
            max: 120.0,
        }
    }
}

/// How the cell radius of a layout pass is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellRadius {
    /// Use this radius as is.
    Fixed(f64),
    /// Derive the radius from item count and container size.
    Auto(RadiusBounds),
}

impl Default for CellRadius {
    fn default() -> Self {
        Self::Auto(RadiusBounds::default())
    }
}

impl CellRadius {
    /// Resolves to a concrete radius for `count` items in `size`.
    ///
    /// Returns `None` when no usable radius exists (degenerate container, no
    /// items in auto mode, or an invalid fixed radius).
    #[must_use]
    pub fn resolve(self, count: usize, size: Size) -> Option<f64> {
        match self {
            Self::Fixed(radius) => (radius.is_finite() && radius > 0.0).then_some(radius),
            Self::Auto(bounds) => auto_cell_radius(count, size, bounds),
        }
    }
}

/// Derives a radius for `count` items so that their honeycomb fits `size`.
///
/// The column/row split of [`grid_dimensions`] gives a per-cell box; half of
/// its smaller side is the starting radius, which is shrunk further if the
/// staggered block would overflow and finally clamped to `bounds`.
#[must_use]
pub fn auto_cell_radius(count: usize, size: Size, bounds: RadiusBounds) -> Option<f64> {
    if count == 0 || !is_valid_area(size) {
        return None;
    }
    let dims = grid_dimensions(count, size.width / size.height);
    let columns = dims.columns as f64;
    let rows = dims.rows as f64;
    let base = (size.width / columns).min(size.height / rows) / 2.0;

    let stagger = if dims.rows > 1 { 0.5 } else { 0.0 };
    let fit_width = size.width / (SQRT_3 * (columns + stagger));
    let fit_height = size.height / (2.0 * (ROW_SPACING_FACTOR * (rows - 1.0) + 1.0));

    let radius = base.min(fit_width).min(fit_height);
    let (lo, hi) = if bounds.min <= bounds.max {
        (bounds.min, bounds.max)
    } else {
        (bounds.max, bounds.min)
    };
    let radius = radius.clamp(lo, hi);
    (radius.is_finite() && radius > 0.0).then_some(radius)
}

/// Returns `true` if `size` is a usable layout target.
#[must_use]
pub fn is_valid_area(size: Size) -> bool {
    let valid = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_DIMENSION;
    valid(size.width) && valid(size.height)
}

/// Display order of two items: higher values first.
///
/// Summary entries always go last so that the "+N others" cell trails the
/// honeycomb regardless of its aggregated value; NaN values go after all
/// numbers.
#[must_use]
pub fn significance_order(a: &MetricItem, b: &MetricItem) -> Ordering {
    a.is_summary()
        .cmp(&b.is_summary())
        .then_with(|| a.value.is_nan().cmp(&b.value.is_nan()))
        .then_with(|| b.value.total_cmp(&a.value))
}

/// Sorts items by [`significance_order`], keeping input order for ties.
pub fn sort_by_significance(items: &mut [&MetricItem]) {
    items.sort_by(|a, b| significance_order(a, b));
}

/// Packs `items` into a honeycomb centered in a `size` rectangle at the origin.
///
/// See [`layout_honeycomb_refs`].
#[must_use]
pub fn layout_honeycomb(items: &[MetricItem], size: Size, radius: f64) -> Vec<PositionedCell<'_>> {
    let refs: Vec<&MetricItem> = items.iter().collect();
    layout_honeycomb_refs(&refs, size, radius)
}

/// Packs borrowed `items` into a honeycomb centered in a `size` rectangle.
///
/// Items are ordered by [`sort_by_significance`] and placed left to right,
/// top to bottom. Columns are one cell width apart, rows are interlocked at
/// three quarters of the cell height, and odd rows shift right by half a cell.
///
/// An invalid rectangle or radius yields an empty layout.
#[must_use]
pub fn layout_honeycomb_refs<'a>(
    items: &[&'a MetricItem],
    size: Size,
    radius: f64,
) -> Vec<PositionedCell<'a>> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "layout_honeycomb",
        count = items.len(),
        width = size.width,
        height = size.height,
        radius
    )
    .entered();

    if items.is_empty() {
        return Vec::new();
    }
    if !is_valid_area(size) || !radius.is_finite() || radius <= 0.0 {
        #[cfg(feature = "tracing")]
        tracing::debug!("degenerate layout target; nothing to render");
        return Vec::new();
    }

    let mut ordered = items.to_vec();
    sort_by_significance(&mut ordered);

    let hex = HexMetrics::new(radius);
    let dims = grid_dimensions(ordered.len(), size.width / size.height);
    let slots: Vec<(usize, usize, Point)> = (0..ordered.len())
        .map(|index| {
            let column = index % dims.columns;
            let row = index / dims.columns;
            let stagger = if row % 2 == 1 { hex.width / 2.0 } else { 0.0 };
            let x = column as f64 * hex.width + stagger;
            let y = row as f64 * hex.row_spacing;
            (column, row, Point::new(x, y))
        })
        .collect();

    // Center the occupied box, which is narrower than the full block when the
    // last staggered row is incomplete.
    let mut occupied = Rect::from_points(slots[0].2, slots[0].2);
    for (_, _, p) in &slots {
        occupied = occupied.union_pt(*p);
    }
    let occupied = occupied.inflate(hex.width / 2.0, hex.height / 2.0);
    let dx = (size.width - occupied.width()) / 2.0 - occupied.x0;
    let dy = (size.height - occupied.height()) / 2.0 - occupied.y0;

    ordered
        .into_iter()
        .zip(slots)
        .map(|(item, (column, row, p))| PositionedCell {
            column: u32::try_from(column).unwrap_or(u32::MAX),
            row: u32::try_from(row).unwrap_or(u32::MAX),
            center: Point::new(finite_or_zero(p.x + dx), finite_or_zero(p.y + dy)),
            item,
        })
        .collect()
}

/// Bounding box of all cell hexagons: centers expanded by `radius`.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn content_bounds(cells: &[PositionedCell<'_>], radius: f64) -> Option<Rect> {
    let first = cells.first()?.center;
    let centers = cells
        .iter()
        .fold(Rect::from_points(first, first), |acc, cell| {
            acc.union_pt(cell.center)
        });
    Some(centers.inflate(radius.abs(), radius.abs()))
}
