// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use polystat_grid::{PositionedCell, content_bounds};

use crate::bounds::{ZoomBounds, ZoomProfile, compute_zoom_bounds};
use crate::modes::{FitMode, FitStrategy};
use crate::transform::ViewTransform;
use crate::transition::TransitionTracker;

/// Slack, in screen pixels, when deciding whether fitted content fits.
const FIT_EPSILON: f64 = 1e-6;

/// Notification emitted after every zoom, pan or transition change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformChanged {
    /// New transform.
    pub transform: ViewTransform,
    /// Whether a grouping recenter is still settling.
    pub is_transitioning: bool,
    /// Layout generation the transform belongs to.
    pub generation: u64,
}

/// Handle returned by [`ViewportController::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&TransformChanged)>;

/// Pan/zoom state for a honeycomb view.
///
/// The controller owns the only mutable view state of the engine: a
/// [`ViewTransform`] constrained by [`ZoomBounds`] that are recomputed from
/// the current cell radius and view size. It supports:
/// - Zooming anchored at the cursor ([`zoom_at`](Self::zoom_at)).
/// - Free panning ([`pan_by`](Self::pan_by)); pan is never clamped.
/// - Fitting laid-out cells into view ([`fit_to_content`](Self::fit_to_content)).
/// - Grouping recenters tracked by a layout generation
///   ([`recenter`](Self::recenter), [`layout_settled`](Self::layout_settled)).
///
/// Consumers observe changes through [`subscribe`](Self::subscribe).
pub struct ViewportController {
    view_size: Size,
    cell_radius: f64,
    transform: ViewTransform,
    bounds: ZoomBounds,
    profile: ZoomProfile,
    transition: TransitionTracker,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("view_size", &self.view_size)
            .field("cell_radius", &self.cell_radius)
            .field("transform", &self.transform)
            .field("bounds", &self.bounds)
            .field("profile", &self.profile)
            .field("transition", &self.transition)
            .field("listeners", &self.listeners.len())
            .field("next_subscription", &self.next_subscription)
            .finish()
    }
}

impl ViewportController {
    /// Creates a controller for a view of `view_size` showing cells of
    /// `cell_radius`, starting at the initial zoom with zero pan.
    #[must_use]
    pub fn new(view_size: Size, cell_radius: f64, profile: ZoomProfile) -> Self {
        let bounds = compute_zoom_bounds(cell_radius, view_size, &profile);
        Self {
            view_size,
            cell_radius,
            transform: ViewTransform::new(bounds.initial, Vec2::ZERO),
            bounds,
            profile,
            transition: TransitionTracker::default(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replaces the transition tracker, e.g. to change its timeout.
    #[must_use]
    pub fn with_transition_tracker(mut self, tracker: TransitionTracker) -> Self {
        self.transition = tracker;
        self
    }

    /// Current view size in screen pixels.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Cell radius the zoom bounds were derived from.
    #[must_use]
    pub fn cell_radius(&self) -> f64 {
        self.cell_radius
    }

    /// Current transform.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.transform.zoom
    }

    /// Current pan offset in screen pixels.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.transform.pan
    }

    /// Current zoom bounds.
    #[must_use]
    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// Active profile.
    #[must_use]
    pub fn profile(&self) -> &ZoomProfile {
        &self.profile
    }

    /// Upper zoom limit for interactive zooming: the computed maximum,
    /// capped by [`ZoomProfile::absolute_max_zoom`] but never below `min`.
    #[must_use]
    pub fn interactive_max_zoom(&self) -> f64 {
        self.bounds
            .max
            .min(self.profile.absolute_max_zoom)
            .max(self.bounds.min)
    }

    /// Sets the view size and recomputes the zoom bounds.
    pub fn set_view_size(&mut self, size: Size) {
        if self.view_size == size {
            return;
        }
        self.view_size = size;
        self.rebuild_bounds();
    }

    /// Sets the cell radius and recomputes the zoom bounds.
    pub fn set_cell_radius(&mut self, radius: f64) {
        if self.cell_radius == radius {
            return;
        }
        self.cell_radius = radius;
        self.rebuild_bounds();
    }

    /// Replaces the profile and recomputes the zoom bounds.
    pub fn set_profile(&mut self, profile: ZoomProfile) {
        self.profile = profile;
        self.rebuild_bounds();
    }

    /// Zooms by `delta` wheel units, keeping `anchor` fixed on screen.
    ///
    /// The new zoom is `zoom + delta * zoom_speed`, clamped to
    /// `[bounds.min, interactive_max_zoom()]`. With an anchor (usually the
    /// cursor), pan is recomputed so the logical point under the anchor stays
    /// there; without one, pan is left unchanged. Returns `true` if the
    /// transform changed.
    pub fn zoom_at(&mut self, delta: f64, anchor: Option<Point>) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let old = self.transform;
        let new_zoom = (old.zoom + delta * self.profile.zoom_speed)
            .clamp(self.bounds.min, self.interactive_max_zoom());
        if (new_zoom - old.zoom).abs() < f64::EPSILON {
            return false;
        }

        let pan = match anchor {
            Some(anchor) => {
                let world = old.view_to_world_point(anchor);
                let pan = anchor.to_vec2() - world.to_vec2() * new_zoom;
                if pan.is_finite() { pan } else { old.pan }
            }
            None => old.pan,
        };
        self.transform = ViewTransform::new(new_zoom, pan);
        self.notify();
        true
    }

    /// Pans by a screen-space delta.
    ///
    /// Pan is unbounded; only a non-finite result is rejected, keeping the
    /// last good value. Returns `true` if the transform changed.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        let pan = self.transform.pan + delta;
        if !pan.is_finite() {
            #[cfg(feature = "tracing")]
            tracing::debug!(?delta, "discarding non-finite pan");
            return false;
        }
        self.transform.pan = pan;
        self.notify();
        true
    }

    /// Sets zoom and pan directly. Zoom is clamped to the bounds; a
    /// non-finite pan keeps the current one.
    pub fn set_transform(&mut self, zoom: f64, pan: Vec2) {
        let zoom = if zoom.is_finite() {
            self.bounds.clamp(zoom)
        } else {
            self.transform.zoom
        };
        let pan = if pan.is_finite() {
            pan
        } else {
            self.transform.pan
        };
        let next = ViewTransform::new(zoom, pan);
        if next != self.transform {
            self.transform = next;
            self.notify();
        }
    }

    /// Resets to the initial zoom of the current bounds and zero pan.
    pub fn reset_zoom(&mut self) {
        self.set_transform(self.bounds.initial, Vec2::ZERO);
    }

    /// Resets to an externally supplied initial zoom and zero pan.
    pub fn reset_to(&mut self, initial_zoom: f64) {
        self.set_transform(initial_zoom, Vec2::ZERO);
    }

    /// Fits all `cells` into the view.
    ///
    /// The content box is the cell centers expanded by `cell_radius`. Each
    /// axis gets the zoom that makes the box fill `1 - margin` of that axis;
    /// the smaller one wins and is clamped to the zoom bounds. See
    /// [`FitStrategy`] for margins and placement. Returns `false` (leaving
    /// the transform untouched) when there is nothing to fit.
    pub fn fit_to_content(
        &mut self,
        cells: &[PositionedCell<'_>],
        cell_radius: f64,
        strategy: FitStrategy,
    ) -> bool {
        let Some(content) = content_bounds(cells, cell_radius) else {
            return false;
        };
        let Some(next) = self.fitted_transform(content, strategy) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(?content, "cannot fit degenerate content");
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(zoom = next.zoom, pan = ?next.pan, ?strategy, "fit to content");
        self.transform = next;
        self.notify();
        true
    }

    /// Refits after a (re)grouping identified by `signature`.
    ///
    /// If the signature is new a transition opens, headers should stay hidden
    /// until [`layout_settled`](Self::layout_settled) is called with the
    /// returned generation (or until the safety timeout passes in
    /// [`poll`](Self::poll)). An unchanged signature refits without a
    /// transition. Returns the current layout generation.
    pub fn recenter(
        &mut self,
        cells: &[PositionedCell<'_>],
        cell_radius: f64,
        strategy: FitStrategy,
        signature: u64,
        now: Duration,
    ) -> u64 {
        if self.transition.begin(signature, now).is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                generation = self.transition.generation(),
                "grouping changed; transition opened"
            );
        }
        if !self.fit_to_content(cells, cell_radius, strategy) {
            self.notify();
        }
        self.transition.generation()
    }

    /// Reports that layout for `generation` has settled, closing its
    /// transition. Stale generations are ignored. Returns `true` if a
    /// transition closed.
    pub fn layout_settled(&mut self, generation: u64) -> bool {
        let closed = self.transition.settle(generation);
        if closed {
            self.notify();
        }
        closed
    }

    /// Applies the transition safety timeout. Returns `true` if a stuck
    /// transition was force-closed.
    pub fn poll(&mut self, now: Duration) -> bool {
        let closed = self.transition.poll(now);
        if closed {
            #[cfg(feature = "tracing")]
            tracing::debug!("transition timed out; force-cleared");
            self.notify();
        }
        closed
    }

    /// Forgets the last grouping signature (grouping switched off).
    pub fn clear_grouping(&mut self) {
        self.transition.forget_signature();
    }

    /// Whether a grouping recenter is still settling.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_transitioning()
    }

    /// Current layout generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.transition.generation()
    }

    /// Registers a listener for [`TransformChanged`] notifications.
    pub fn subscribe(&mut self, listener: impl FnMut(&TransformChanged) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Converts a screen point into logical coordinates.
    #[must_use]
    pub fn view_to_world_point(&self, pt: Point) -> Point {
        self.transform.view_to_world_point(pt)
    }

    /// Converts a logical point into screen coordinates.
    #[must_use]
    pub fn world_to_view_point(&self, pt: Point) -> Point {
        self.transform.world_to_view_point(pt)
    }

    /// Logical rectangle currently visible.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        self.transform.visible_world_rect(self.view_size)
    }

    /// Snapshot of the controller state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            view_size: self.view_size,
            cell_radius: self.cell_radius,
            visible_world_rect: self.visible_world_rect(),
            transform: self.transform,
            bounds: self.bounds,
            interactive_max_zoom: self.interactive_max_zoom(),
            is_transitioning: self.is_transitioning(),
            generation: self.generation(),
            listeners: self.listeners.len(),
        }
    }

    fn fitted_transform(&self, content: Rect, strategy: FitStrategy) -> Option<ViewTransform> {
        let view = self.view_size;
        if content.width() <= 0.0 || content.height() <= 0.0 || !content.is_finite() {
            return None;
        }
        if !(view.width > 0.0 && view.height > 0.0 && view.is_finite()) {
            return None;
        }

        let (margin_x, margin_y, target) = match strategy {
            FitStrategy::Normal => {
                let m = self.profile.fit_margin;
                (m, m, Rect::from_origin_size(Point::ORIGIN, view))
            }
            FitStrategy::Clustered { chrome_height } => {
                let chrome = if chrome_height.is_finite() {
                    chrome_height.clamp(0.0, view.height)
                } else {
                    0.0
                };
                let margin_x = self.profile.clustered_side_margin;
                let margin_y = (chrome / view.height).max(self.profile.fit_margin);
                let side = view.width * margin_x / 2.0;
                let target = Rect::new(
                    side,
                    chrome,
                    view.width - side,
                    chrome + (1.0 - margin_y) * view.height,
                );
                (margin_x, margin_y, target)
            }
        };

        let zoom_x = (1.0 - margin_x) * view.width / content.width();
        let zoom_y = (1.0 - margin_y) * view.height / content.height();
        let zoom = zoom_x.min(zoom_y);
        if !zoom.is_finite() || zoom <= 0.0 {
            return None;
        }
        let zoom = self.bounds.clamp(zoom);

        let (mode_x, mode_y) = match strategy {
            FitStrategy::Normal => (FitMode::Center, FitMode::Center),
            FitStrategy::Clustered { .. } => {
                let fits_x = content.width() * zoom <= target.width() + FIT_EPSILON;
                let fits_y = content.height() * zoom <= target.height() + FIT_EPSILON;
                if fits_x && fits_y {
                    (FitMode::Center, FitMode::Center)
                } else {
                    let x = if fits_x {
                        FitMode::Center
                    } else {
                        FitMode::AlignMin
                    };
                    (x, FitMode::AlignMin)
                }
            }
        };
        let place = |mode: FitMode, lo: f64, hi: f64, content_lo: f64, content_hi: f64| match mode {
            FitMode::Center => (lo + hi) / 2.0 - (content_lo + content_hi) / 2.0 * zoom,
            FitMode::AlignMin => lo - content_lo * zoom,
        };
        let pan = Vec2::new(
            place(mode_x, target.x0, target.x1, content.x0, content.x1),
            place(mode_y, target.y0, target.y1, content.y0, content.y1),
        );
        pan.is_finite().then_some(ViewTransform::new(zoom, pan))
    }

    fn rebuild_bounds(&mut self) {
        self.bounds = compute_zoom_bounds(self.cell_radius, self.view_size, &self.profile);
        let zoom = self.bounds.clamp(self.transform.zoom);
        if zoom != self.transform.zoom {
            self.transform.zoom = zoom;
            self.notify();
        }
    }

    fn notify(&mut self) {
        let event = TransformChanged {
            transform: self.transform,
            is_transitioning: self.transition.is_transitioning(),
            generation: self.transition.generation(),
        };
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

/// Debug snapshot of a [`ViewportController`].
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// View size in screen pixels.
    pub view_size: Size,
    /// Cell radius used for the zoom bounds.
    pub cell_radius: f64,
    /// Logical rectangle visible through the view.
    pub visible_world_rect: Rect,
    /// Current transform.
    pub transform: ViewTransform,
    /// Current zoom bounds.
    pub bounds: ZoomBounds,
    /// Effective interactive zoom limit.
    pub interactive_max_zoom: f64,
    /// Whether a recenter transition is open.
    pub is_transitioning: bool,
    /// Current layout generation.
    pub generation: u64,
    /// Number of registered listeners.
    pub listeners: usize,
}
