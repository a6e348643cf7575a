// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;
use core::fmt;
use core::time::Duration;
use std::rc::Rc;

use kurbo::{Point, Size};
use polystat_cluster::{ByLabel, FilterStack, GroupAnchor, GroupingSignature, cluster};
use polystat_grid::{MetricItem, PositionedCell, SQRT_3, layout_honeycomb_refs};
use polystat_present::{CellPresenter, Colorizer, SeverityPalette, TextMeasurer};
use polystat_view2d::{
    DragSession, FitStrategy, PointerCapture, TransformChanged, TransitionTracker,
    ViewportController,
};
use polystat_virtual::VirtualizationFilter;

use crate::cap::cap_items;
use crate::config::DashboardConfig;
use crate::frame::{DrawRecord, Frame, HeaderGate};

/// Radius assumed before the first dataset arrives.
const PLACEHOLDER_RADIUS: f64 = 20.0;

/// Cells of the current dataset, either one honeycomb or one per group.
struct Placement<'a> {
    cells: Vec<PositionedCell<'a>>,
    radius: Option<f64>,
    anchors: Vec<GroupAnchor>,
    signature: Option<GroupingSignature>,
    chrome_height: f64,
}

fn place<'a>(
    items: &'a [MetricItem],
    group_by: Option<&str>,
    filters: &FilterStack,
    size: Size,
    config: &DashboardConfig,
) -> Placement<'a> {
    match group_by {
        Some(key) => {
            let cluster_config = config.cluster_config();
            let layout = cluster(items, &ByLabel::new(key), filters, size, &cluster_config);
            Placement {
                cells: layout.cells,
                radius: layout.cell_radius,
                anchors: layout.anchors,
                signature: Some(layout.signature),
                chrome_height: size.height * cluster_config.chrome_fraction,
            }
        }
        None => {
            let visible = filters.apply(items);
            let radius = config.cell_radius.resolve(visible.len(), size);
            Placement {
                cells: radius.map_or_else(Vec::new, |r| layout_honeycomb_refs(&visible, size, r)),
                radius,
                anchors: Vec::new(),
                signature: None,
                chrome_height: 0.0,
            }
        }
    }
}

/// Returns `true` if `pt` lies in the pointy-top hexagon of `radius` at
/// `center`.
fn hex_contains(center: Point, radius: f64, pt: Point) -> bool {
    let dx = (pt.x - center.x).abs();
    let dy = (pt.y - center.y).abs();
    dx <= radius * SQRT_3 / 2.0 && dy <= radius - dx / SQRT_3
}

/// A complete honeycomb dashboard: data, grouping, drill-down, viewport, and
/// per-frame presentation.
///
/// The dashboard is driven by the host:
/// - data: [`set_items`](Self::set_items), [`set_group_by`](Self::set_group_by),
///   [`drill_down`](Self::drill_down) and the other filter operations,
/// - input: [`pointer_down`](Self::pointer_down), [`pointer_move`](Self::pointer_move),
///   [`pointer_up`](Self::pointer_up), [`wheel`](Self::wheel), [`resize`](Self::resize),
/// - rendering: [`frame`](Self::frame), and
///   [`layout_settled`](Self::layout_settled) once the host has drawn a frame
///   for a new generation.
///
/// Time is passed in as a monotonic [`Duration`] so that behavior is
/// deterministic.
pub struct Dashboard<M> {
    config: DashboardConfig,
    items: Vec<MetricItem>,
    group_by: Option<String>,
    filters: FilterStack,
    viewport: ViewportController,
    presenter: CellPresenter<M>,
    palette: SeverityPalette,
    virtualization: VirtualizationFilter,
    drag: Option<DragSession<Box<dyn PointerCapture>>>,
    gate: HeaderGate,
    signature: Option<GroupingSignature>,
    last_change: Rc<Cell<Option<TransformChanged>>>,
}

impl<M: fmt::Debug> fmt::Debug for Dashboard<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("group_by", &self.group_by)
            .field("filters", &self.filters)
            .field("viewport", &self.viewport)
            .field("presenter", &self.presenter)
            .field("palette", &self.palette)
            .field("virtualization", &self.virtualization)
            .field("dragging", &self.drag.is_some())
            .field("gate", &self.gate)
            .field("signature", &self.signature)
            .field("last_change", &self.last_change.get())
            .finish()
    }
}

impl<M: TextMeasurer> Dashboard<M> {
    /// Creates an empty dashboard for a view of `view_size`.
    pub fn new(view_size: Size, config: DashboardConfig, measurer: M) -> Self {
        let radius = config
            .cell_radius
            .resolve(1, view_size)
            .unwrap_or(PLACEHOLDER_RADIUS);
        let mut viewport = ViewportController::new(view_size, radius, config.zoom)
            .with_transition_tracker(TransitionTracker::new(config.transition_timeout()));
        let last_change = Rc::new(Cell::new(None));
        let sink = Rc::clone(&last_change);
        viewport.subscribe(move |change| sink.set(Some(*change)));
        Self {
            presenter: CellPresenter::new(measurer, config.text),
            virtualization: VirtualizationFilter::new(config.virtualization),
            config,
            items: Vec::new(),
            group_by: None,
            filters: FilterStack::new(),
            viewport,
            palette: SeverityPalette::default(),
            drag: None,
            gate: HeaderGate::new(),
            signature: None,
            last_change,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Current items, after capping.
    #[must_use]
    pub fn items(&self) -> &[MetricItem] {
        &self.items
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// The viewport, for subscriptions and direct manipulation.
    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    /// Drill-down selections.
    #[must_use]
    pub fn filters(&self) -> &FilterStack {
        &self.filters
    }

    /// Label currently grouped by.
    #[must_use]
    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    /// Replaces the severity colors.
    pub fn set_palette(&mut self, palette: SeverityPalette) {
        self.palette = palette;
    }

    /// Replaces the dataset.
    ///
    /// Items beyond [`DashboardConfig::max_items`] collapse into a summary
    /// cell. A fresh ungrouped dataset resets the zoom; a grouped one
    /// recenters only if the set of groups changed.
    pub fn set_items(&mut self, items: Vec<MetricItem>, now: Duration) {
        self.items = cap_items(items, self.config.max_items);
        self.relayout(now, true);
    }

    /// Groups by label `key`, or switches grouping off.
    pub fn set_group_by(&mut self, key: Option<String>, now: Duration) {
        if self.group_by == key {
            return;
        }
        self.group_by = key;
        self.relayout(now, false);
    }

    /// Drills into the group `value` of the current grouping label.
    ///
    /// Returns `false` when not grouped.
    pub fn drill_down(&mut self, value: impl Into<String>, now: Duration) -> bool {
        let Some(key) = self.group_by.clone() else {
            return false;
        };
        self.filters.push(key, value);
        self.relayout(now, false);
        true
    }

    /// Leaves the innermost drill-down selection.
    pub fn pop_filter(&mut self, now: Duration) -> bool {
        let popped = self.filters.pop().is_some();
        if popped {
            self.relayout(now, false);
        }
        popped
    }

    /// Keeps the first `level` selections (breadcrumb navigation).
    pub fn truncate_filters(&mut self, level: usize, now: Duration) {
        if level < self.filters.len() {
            self.filters.truncate(level);
            self.relayout(now, false);
        }
    }

    /// Removes every drill-down selection.
    pub fn clear_filters(&mut self, now: Duration) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.relayout(now, false);
        }
    }

    /// Applies a new view size.
    pub fn resize(&mut self, size: Size, now: Duration) {
        self.viewport.set_view_size(size);
        self.relayout(now, false);
    }

    /// Starts a drag-to-pan at `pos`, holding `capture` until
    /// [`pointer_up`](Self::pointer_up). A drag already in progress ends.
    pub fn pointer_down(&mut self, pos: Point, capture: Box<dyn PointerCapture>) {
        if let Some(previous) = self.drag.take() {
            previous.finish();
        }
        self.drag = Some(DragSession::begin(capture, pos));
    }

    /// Pans by the pointer movement. Returns `true` if the view moved.
    pub fn pointer_move(&mut self, pos: Point) -> bool {
        match &mut self.drag {
            Some(drag) => drag.update(pos, &mut self.viewport),
            None => false,
        }
    }

    /// Ends the drag and releases pointer capture.
    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            drag.finish();
        }
    }

    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Zooms one step about `pos`: in for negative `delta_y` (wheel away
    /// from the user), out for positive. Returns `true` if the zoom changed.
    pub fn wheel(&mut self, delta_y: f64, pos: Point) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        self.viewport.zoom_at(-delta_y.signum(), Some(pos))
    }

    /// Reports that the host has drawn `generation`; see
    /// [`ViewportController::layout_settled`].
    pub fn layout_settled(&mut self, generation: u64) -> bool {
        self.viewport.layout_settled(generation)
    }

    /// Item under the screen point `pos`, including cells too small to show
    /// text.
    #[must_use]
    pub fn item_at(&self, pos: Point) -> Option<&MetricItem> {
        let placement = place(
            &self.items,
            self.group_by.as_deref(),
            &self.filters,
            self.viewport.view_size(),
            &self.config,
        );
        let radius = placement.radius?;
        let logical = self.viewport.view_to_world_point(pos);
        placement
            .cells
            .iter()
            .find(|cell| hex_contains(cell.center, radius, logical))
            .map(|cell| cell.item)
    }

    /// Builds the frame to draw at `now`.
    pub fn frame(&mut self, now: Duration) -> Frame {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("frame", items = self.items.len()).entered();

        self.viewport.poll(now);
        if let Some(change) = self.last_change.take() {
            self.gate.observe_transform(&change);
        }

        let placement = place(
            &self.items,
            self.group_by.as_deref(),
            &self.filters,
            self.viewport.view_size(),
            &self.config,
        );
        let transform = self.viewport.transform();
        let radius = placement.radius.unwrap_or(0.0);
        let progress = self.viewport.bounds().progress(transform.zoom);
        let colorizer = Colorizer::new(
            placement.cells.iter().map(|cell| cell.item),
            self.palette,
            self.config.severity,
        );

        let visible =
            self.virtualization
                .cull(&placement.cells, transform, self.viewport.view_size(), radius);
        let draws = visible
            .into_iter()
            .map(|cell| {
                let presented =
                    self.presenter
                        .present(cell.item, &colorizer, radius, transform.zoom, progress);
                DrawRecord {
                    center: cell.center,
                    radius,
                    color: presented.color,
                    tier: presented.tier,
                    text_lines: presented.lines,
                    tooltip: presented.tooltip,
                    is_summary: cell.item.is_summary(),
                }
            })
            .collect();

        let is_transitioning = self.viewport.is_transitioning();
        let headers = (placement.signature.is_some() && !is_transitioning && self.gate.is_open())
            .then(|| placement.anchors.clone());

        Frame {
            draws,
            transform,
            headers,
            generation: self.viewport.generation(),
            is_transitioning,
            total_cells: placement.cells.len(),
        }
    }

    fn relayout(&mut self, now: Duration, fresh_data: bool) {
        let placement = place(
            &self.items,
            self.group_by.as_deref(),
            &self.filters,
            self.viewport.view_size(),
            &self.config,
        );
        if let Some(radius) = placement.radius {
            self.viewport.set_cell_radius(radius);
        }
        let radius = self.viewport.cell_radius();

        let Some(signature) = placement.signature else {
            let was_grouped = self.signature.take().is_some();
            if was_grouped {
                self.viewport.clear_grouping();
                self.gate.clear();
            }
            if fresh_data || was_grouped {
                self.viewport.reset_zoom();
            }
            return;
        };

        let fingerprint = signature.fingerprint();
        if self.signature.as_ref() != Some(&signature) {
            let generation = self.viewport.recenter(
                &placement.cells,
                radius,
                FitStrategy::Clustered {
                    chrome_height: placement.chrome_height,
                },
                fingerprint,
                now,
            );
            #[cfg(feature = "tracing")]
            tracing::debug!(
                generation,
                groups = signature.values().len(),
                "regrouped; headers hidden until settled"
            );
            self.gate.reset(fingerprint, generation);
            self.signature = Some(signature);
        }
        self.gate.observe_anchors(fingerprint);
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::{Point, Size};
    use polystat_grid::MetricItem;
    use polystat_present::MonospaceMeasurer;

    use super::{Dashboard, hex_contains};
    use crate::DashboardConfig;

    fn dashboard() -> Dashboard<MonospaceMeasurer> {
        Dashboard::new(
            Size::new(1000.0, 800.0),
            DashboardConfig::default(),
            MonospaceMeasurer::default(),
        )
    }

    #[test]
    fn hex_hit_test_matches_pointy_top_shape() {
        let c = Point::new(0.0, 0.0);
        assert!(hex_contains(c, 10.0, Point::new(0.0, 9.9)));
        assert!(hex_contains(c, 10.0, Point::new(8.6, 0.0)));
        assert!(!hex_contains(c, 10.0, Point::new(8.0, 8.0)), "outside the slanted edge");
        assert!(!hex_contains(c, 10.0, Point::new(8.7, 0.0)));
    }

    #[test]
    fn wheel_direction_and_zero_delta() {
        let mut d = dashboard();
        d.set_items(vec![MetricItem::new("a", 1.0)], Duration::ZERO);
        let cursor = Point::new(10.0, 10.0);
        let before = d.viewport().zoom();
        assert!(!d.wheel(0.0, cursor));
        assert!(!d.wheel(f64::NAN, cursor));
        assert!(d.wheel(-120.0, cursor));
        assert!(d.viewport().zoom() > before);
        d.wheel(120.0, cursor);
        d.wheel(120.0, cursor);
        assert!(d.viewport().zoom() < before);
    }

    #[test]
    fn drill_down_requires_grouping() {
        let mut d = dashboard();
        assert!(!d.drill_down("x", Duration::ZERO));
        d.set_group_by(Some("env".to_owned()), Duration::ZERO);
        assert!(d.drill_down("prod", Duration::ZERO));
        assert_eq!(d.filters().len(), 1);
        assert!(d.pop_filter(Duration::ZERO));
        assert!(!d.pop_filter(Duration::ZERO));
    }
}
