// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polystat Virtual: viewport culling for honeycomb cells.
//!
//! Small dashboards draw every cell. Past a threshold (1000 cells by default)
//! the cost of text fitting and drawing cells the user cannot see dominates,
//! so [`VirtualizationFilter`] keeps only cells whose centers fall inside the
//! visible logical rectangle, padded by two cell radii so partially visible
//! hexagons at the edges are still drawn.
//!
//! Culling is a linear scan over already positioned cells; it never reorders
//! them. Hosts that cull every frame can reuse a buffer through
//! [`VirtualizationFilter::cull_into`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Size, Vec2};
//! use polystat_grid::{MetricItem, layout_honeycomb};
//! use polystat_view2d::ViewTransform;
//! use polystat_virtual::{VirtualizationConfig, VirtualizationFilter};
//!
//! let items: Vec<MetricItem> = (0..2000)
//!     .map(|i| MetricItem::new(format!("m{i}"), f64::from(i)))
//!     .collect();
//! let cells = layout_honeycomb(&items, Size::new(4000.0, 4000.0), 40.0);
//!
//! let filter = VirtualizationFilter::new(VirtualizationConfig::default());
//! // An 800x600 view at 2x, looking at logical (500, 700)..(900, 1000).
//! let transform = ViewTransform::new(2.0, Vec2::new(-1000.0, -1400.0));
//! let visible = filter.cull(&cells, transform, Size::new(800.0, 600.0), 40.0);
//! assert!(!visible.is_empty());
//! assert!(visible.len() < cells.len());
//! ```

mod filter;

pub use filter::{DEFAULT_THRESHOLD, VirtualizationConfig, VirtualizationFilter, cull};
