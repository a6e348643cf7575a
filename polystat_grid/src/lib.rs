// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polystat Grid: metric items and honeycomb packing.
//!
//! This crate holds the data model shared by the Polystat layout crates and
//! the grid layout engine that packs an ordered list of metrics into a
//! honeycomb of pointy-top hexagons:
//!
//! - [`MetricItem`]: a named sample with labels and an optional explicit color.
//! - [`PositionedCell`]: an item placed at a honeycomb coordinate in logical space.
//! - [`layout_honeycomb`]: sorts items by value and centers their honeycomb in a
//!   rectangle.
//! - [`grid_dimensions`] / [`auto_cell_radius`]: the count-and-aspect heuristic
//!   used to size grids, shared with the cluster layout.
//!
//! Layout never fails. Invalid rectangles or radii produce an empty cell list
//! and non-finite intermediate coordinates collapse to `0.0`, so a caller can
//! always render *something*.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use polystat_grid::{CellRadius, MetricItem, layout_honeycomb};
//!
//! let items: Vec<MetricItem> = (0..12)
//!     .map(|i| MetricItem::new(format!("cpu{i}"), f64::from(i)))
//!     .collect();
//! let size = Size::new(800.0, 600.0);
//! let radius = CellRadius::default().resolve(items.len(), size).unwrap();
//!
//! let cells = layout_honeycomb(&items, size, radius);
//! assert_eq!(cells.len(), 12);
//! // Highest value first.
//! assert_eq!(cells[0].item.name, "cpu11");
//! ```

mod item;
mod layout;

pub use item::{ItemKind, MetricItem, PositionedCell};
pub use layout::{
    CellRadius, GridDimensions, HexMetrics, MAX_DIMENSION, ROW_SPACING_FACTOR, RadiusBounds,
    SQRT_3, auto_cell_radius, content_bounds, grid_dimensions, is_valid_area, layout_honeycomb,
    layout_honeycomb_refs, significance_order, sort_by_significance,
};

/// Replaces NaN and infinities with `0.0`.
///
/// Used wherever a coordinate leaves a computation, so one degenerate value
/// cannot spread through a whole layout.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
