// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content-aware zoom limits.

use kurbo::Size;

/// Tunable constants for zoom limits, wheel response and content fitting.
///
/// The defaults suit a dashboard of a few hundred to a few thousand cells;
/// denser or sparser profiles can be substituted without touching the
/// algorithms that read them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoomProfile {
    /// Smallest on-screen cell radius, in pixels, the minimum zoom allows.
    pub min_screen_radius: f64,
    /// Largest on-screen cell radius the maximum zoom allows, as a fraction
    /// of the smaller view dimension.
    pub max_screen_fraction: f64,
    /// Lower limit for the minimum zoom.
    pub zoom_floor: f64,
    /// Upper limit for the maximum zoom.
    pub zoom_ceiling: f64,
    /// Upper limit for the initial zoom.
    pub initial_zoom_cap: f64,
    /// Initial zoom as a fraction of the maximum zoom, before capping.
    pub initial_max_fraction: f64,
    /// Zoom change per unit of wheel delta.
    pub zoom_speed: f64,
    /// Hard cap on interactive zoom, applied on top of the computed maximum.
    pub absolute_max_zoom: f64,
    /// Margin, as a fraction of each view axis, left around fitted content.
    pub fit_margin: f64,
    /// Horizontal margin used when fitting grouped content.
    pub clustered_side_margin: f64,
}

impl Default for ZoomProfile {
    fn default() -> Self {
        Self {
            min_screen_radius: 6.0,
            max_screen_fraction: 0.4,
            zoom_floor: 0.01,
            zoom_ceiling: 50.0,
            initial_zoom_cap: 1.0,
            initial_max_fraction: 0.3,
            zoom_speed: 0.3,
            absolute_max_zoom: 6.0,
            fit_margin: 0.1,
            clustered_side_margin: 0.2,
        }
    }
}

/// Zoom range and starting zoom for a given cell radius and view size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    /// Smallest allowed zoom.
    pub min: f64,
    /// Largest allowed zoom.
    pub max: f64,
    /// Suggested zoom for a freshly loaded dataset.
    pub initial: f64,
}

impl ZoomBounds {
    /// Bounds used when the radius or view size cannot produce meaningful ones.
    pub const FALLBACK: Self = Self {
        min: 0.1,
        max: 6.0,
        initial: 1.0,
    };

    /// Clamps `zoom` into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }

    /// Returns how far `zoom` has progressed through the range, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, zoom: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        ((zoom - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Derives zoom limits from the cell radius and the view size.
///
/// - `min` keeps a cell at least `min_screen_radius` pixels wide on screen
///   (never below `zoom_floor`).
/// - `max` keeps a cell no larger than `max_screen_fraction` of the smaller
///   view dimension (never above `zoom_ceiling`, never below `2 * min`).
/// - `initial` is `min(initial_zoom_cap, max * initial_max_fraction)`, clamped
///   into the range.
///
/// Non-positive or non-finite inputs return [`ZoomBounds::FALLBACK`].
#[must_use]
pub fn compute_zoom_bounds(cell_radius: f64, view_size: Size, profile: &ZoomProfile) -> ZoomBounds {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(cell_radius) || !positive(view_size.width) || !positive(view_size.height) {
        return ZoomBounds::FALLBACK;
    }
    let smaller = view_size.width.min(view_size.height);

    let min = (profile.min_screen_radius / cell_radius).max(profile.zoom_floor);
    let max = (profile.max_screen_fraction * smaller / cell_radius)
        .min(profile.zoom_ceiling)
        .max(2.0 * min);
    if !min.is_finite() || !max.is_finite() || min <= 0.0 {
        return ZoomBounds::FALLBACK;
    }
    let initial = profile
        .initial_zoom_cap
        .min(max * profile.initial_max_fraction)
        .clamp(min, max);

    ZoomBounds { min, max, initial }
}
