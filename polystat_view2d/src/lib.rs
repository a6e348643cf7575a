// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polystat View 2D: the pan/zoom viewport of a honeycomb dashboard.
//!
//! This crate provides a small, headless model of the view over the logical
//! plane in which honeycomb cells are laid out. It focuses on:
//! - Zoom limits derived from cell radius and view size ([`compute_zoom_bounds`]).
//! - Zooming anchored at the cursor and unbounded panning.
//! - Fitting laid-out content into view, with a clustered mode that reserves
//!   room for group headers.
//! - Recenter transitions keyed by a layout generation, so dependent chrome
//!   knows when geometry is current.
//! - Drag sessions that hold host pointer capture only for the duration of a
//!   gesture.
//!
//! It does **not** own any rendering backend or event loop. Callers are
//! expected to:
//! - Feed pointer, wheel, and resize events into [`ViewportController`] and
//!   [`DragSession`].
//! - Apply [`ViewTransform`] (`screen = logical * zoom + pan`) when drawing.
//! - Observe [`TransformChanged`] notifications through
//!   [`ViewportController::subscribe`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use polystat_view2d::{ViewportController, ZoomProfile};
//!
//! // 1000x800 view showing cells of radius 20.
//! let mut view = ViewportController::new(Size::new(1000.0, 800.0), 20.0, ZoomProfile::default());
//! assert_eq!(view.zoom(), view.bounds().initial);
//!
//! // One wheel notch in, anchored at the cursor.
//! let cursor = Point::new(400.0, 300.0);
//! let before = view.view_to_world_point(cursor);
//! view.zoom_at(1.0, Some(cursor));
//! let after = view.view_to_world_point(cursor);
//! assert!((after - before).hypot() < 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - Zoom is uniform and axis-aligned; there is no rotation.
//! - Pan is never clamped: content may be dragged off-view on purpose. Only
//!   non-finite pans are rejected.
//! - All tunables live in [`ZoomProfile`].

mod bounds;
mod controller;
pub mod drag;
mod modes;
mod transform;
mod transition;

pub use bounds::{ZoomBounds, ZoomProfile, compute_zoom_bounds};
pub use controller::{SubscriptionId, TransformChanged, ViewportController, ViewportDebugInfo};
pub use drag::{DragSession, PointerCapture};
pub use modes::{FitMode, FitStrategy};
pub use transform::ViewTransform;
pub use transition::{DEFAULT_TRANSITION_TIMEOUT, TransitionTracker};
