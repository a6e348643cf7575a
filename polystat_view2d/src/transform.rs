// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Uniform zoom plus pan mapping logical coordinates to the screen.
///
/// `screen = logical * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Uniform scale factor.
    pub zoom: f64,
    /// Screen-space translation applied after scaling.
    pub pan: Vec2,
}

impl ViewTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        zoom: 1.0,
        pan: Vec2::ZERO,
    };

    /// Creates a transform from its parts.
    #[must_use]
    pub fn new(zoom: f64, pan: Vec2) -> Self {
        Self { zoom, pan }
    }

    /// Returns `true` if zoom is finite and positive and pan is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.zoom.is_finite() && self.zoom > 0.0 && self.pan.is_finite()
    }

    /// The transform as an affine map.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Maps a logical point to screen coordinates.
    #[must_use]
    pub fn world_to_view_point(&self, pt: Point) -> Point {
        Point::new(pt.x * self.zoom + self.pan.x, pt.y * self.zoom + self.pan.y)
    }

    /// Maps a screen point back to logical coordinates.
    #[must_use]
    pub fn view_to_world_point(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.pan.x) / self.zoom,
            (pt.y - self.pan.y) / self.zoom,
        )
    }

    /// Logical rectangle visible through a `view_size` screen area anchored
    /// at the origin: `[-pan / zoom, (size - pan) / zoom]` per axis.
    #[must_use]
    pub fn visible_world_rect(&self, view_size: Size) -> Rect {
        Rect::from_points(
            self.view_to_world_point(Point::ORIGIN),
            self.view_to_world_point(Point::new(view_size.width, view_size.height)),
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::ViewTransform;

    #[test]
    fn world_view_roundtrip() {
        let t = ViewTransform::new(2.5, Vec2::new(-40.0, 12.0));
        let world = Point::new(10.0, -5.0);
        let back = t.view_to_world_point(t.world_to_view_point(world));
        assert!((back - world).hypot() < 1e-9);
        let affine = t.to_affine() * world;
        assert!((affine - t.world_to_view_point(world)).hypot() < 1e-9);
    }

    #[test]
    fn visible_rect_matches_pan_and_zoom() {
        let t = ViewTransform::new(2.0, Vec2::new(-100.0, -50.0));
        let visible = t.visible_world_rect(Size::new(400.0, 300.0));
        assert_eq!(visible.x0, 50.0);
        assert_eq!(visible.y0, 25.0);
        assert_eq!(visible.x1, 250.0);
        assert_eq!(visible.y1, 175.0);
    }
}
