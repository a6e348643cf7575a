// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use peniko::Color;
use polystat_cluster::GroupAnchor;
use polystat_present::{DetailTier, TextLines};
use polystat_view2d::{TransformChanged, ViewTransform};

/// One cell to draw.
#[derive(Clone, Debug)]
pub struct DrawRecord {
    /// Cell center in logical coordinates.
    pub center: Point,
    /// Cell radius in logical units.
    pub radius: f64,
    /// Fill color.
    pub color: Color,
    /// Amount of text shown.
    pub tier: DetailTier,
    /// Fitted text lines, sized in screen pixels.
    pub text_lines: TextLines,
    /// Hover text.
    pub tooltip: String,
    /// Whether this is the "+N others" cell.
    pub is_summary: bool,
}

/// Everything a renderer needs for one repaint.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Visible cells, in layout order.
    pub draws: Vec<DrawRecord>,
    /// Transform mapping logical coordinates to the screen.
    pub transform: ViewTransform,
    /// Group header anchors in logical coordinates.
    ///
    /// `None` when ungrouped and while a regrouping is settling.
    pub headers: Option<Vec<GroupAnchor>>,
    /// Layout generation the frame belongs to.
    pub generation: u64,
    /// Whether a recenter transition is in flight.
    pub is_transitioning: bool,
    /// Cells laid out before culling.
    pub total_cells: usize,
}

/// Decides when group headers may be shown after a regrouping.
///
/// Headers are positioned from anchors in logical space and drawn through the
/// current transform. Right after a regrouping either side may still be stale,
/// so the gate opens only once it has seen both the settled transform of the
/// recenter's generation and the anchors of the new grouping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderGate {
    signature: Option<u64>,
    generation: u64,
    transform_ready: bool,
    anchors_ready: bool,
}

impl HeaderGate {
    /// Creates a closed gate with no grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the gate for a regrouping with `signature` recentered in
    /// `generation`.
    pub fn reset(&mut self, signature: u64, generation: u64) {
        *self = Self {
            signature: Some(signature),
            generation,
            transform_ready: false,
            anchors_ready: false,
        };
    }

    /// Closes the gate because grouping was switched off.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Records a transform notification.
    pub fn observe_transform(&mut self, change: &TransformChanged) {
        if self.signature.is_some() && change.generation == self.generation && !change.is_transitioning
        {
            self.transform_ready = true;
        }
    }

    /// Records that anchors for `signature` were computed.
    pub fn observe_anchors(&mut self, signature: u64) {
        if self.signature == Some(signature) {
            self.anchors_ready = true;
        }
    }

    /// Returns `true` if headers may be shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.transform_ready && self.anchors_ready
    }
}

#[cfg(test)]
mod tests {
    use polystat_view2d::{TransformChanged, ViewTransform};

    use super::HeaderGate;

    fn change(generation: u64, is_transitioning: bool) -> TransformChanged {
        TransformChanged {
            transform: ViewTransform::IDENTITY,
            is_transitioning,
            generation,
        }
    }

    #[test]
    fn opens_after_transform_and_anchors() {
        let mut gate = HeaderGate::new();
        gate.reset(7, 1);
        assert!(!gate.is_open());
        gate.observe_anchors(7);
        assert!(!gate.is_open());
        gate.observe_transform(&change(1, true));
        assert!(!gate.is_open(), "still transitioning");
        gate.observe_transform(&change(1, false));
        assert!(gate.is_open());
    }

    #[test]
    fn stale_observations_are_ignored() {
        let mut gate = HeaderGate::new();
        gate.reset(7, 2);
        gate.observe_anchors(6);
        gate.observe_transform(&change(1, false));
        assert!(!gate.is_open());

        gate.observe_anchors(7);
        gate.observe_transform(&change(2, false));
        assert!(gate.is_open());

        gate.reset(8, 3);
        assert!(!gate.is_open());
        gate.clear();
        gate.observe_transform(&change(0, false));
        assert!(!gate.is_open());
    }
}
