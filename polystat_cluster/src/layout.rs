// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};
use polystat_grid::{
    CellRadius, MetricItem, PositionedCell, RadiusBounds, auto_cell_radius, grid_dimensions,
    is_valid_area, layout_honeycomb_refs,
};

use crate::filter::FilterStack;
use crate::group::{Bucket, GroupKeySelector, GroupingSignature, partition};

/// Tunables for [`cluster`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterConfig {
    /// Fraction of the height reserved at the top for externally drawn chrome.
    pub chrome_fraction: f64,
    /// Fraction of each tile, per axis, given to its honeycomb.
    pub usable_fraction: f64,
    /// Cell radius shared by all groups.
    pub cell_radius: CellRadius,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            chrome_fraction: 1.0 / 3.0,
            usable_fraction: 0.6,
            cell_radius: CellRadius::default(),
        }
    }
}

/// Sub-rectangle of the logical plane owned by one group's honeycomb.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupRegion {
    /// Bucket index, in first-seen order.
    pub group_id: usize,
    /// Shared label value of the group.
    pub group_value: String,
    /// Top-left corner of the usable area.
    pub offset: Point,
    /// Size of the usable area.
    pub area: Size,
}

impl GroupRegion {
    /// The region as a rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.area)
    }
}

/// Placement hint for a group header drawn above its honeycomb.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupAnchor {
    /// Bucket index, in first-seen order.
    pub group_id: usize,
    /// Shared label value of the group.
    pub group_value: String,
    /// Midpoint of the group's cell centers along x.
    pub center_x: f64,
    /// Topmost cell center minus the cell radius.
    pub top_edge_y: f64,
    /// Number of cells in the group.
    pub cell_count: usize,
}

/// Result of a cluster pass.
#[derive(Clone, Debug)]
pub struct ClusterLayout<'a> {
    /// One region per group, in bucket order.
    pub regions: Vec<GroupRegion>,
    /// Cells of every group, grouped in bucket order.
    pub cells: Vec<PositionedCell<'a>>,
    /// One header anchor per non-empty group.
    pub anchors: Vec<GroupAnchor>,
    /// Suggested zoom for the grouped view, in `[0.1, 1.0]`.
    pub auto_zoom: f64,
    /// Radius used for every cell, if one could be resolved.
    pub cell_radius: Option<f64>,
    /// Identity of the grouping, for recenter decisions.
    pub signature: GroupingSignature,
}

impl ClusterLayout<'_> {
    fn empty(signature: GroupingSignature) -> Self {
        Self {
            regions: Vec::new(),
            cells: Vec::new(),
            anchors: Vec::new(),
            auto_zoom: 1.0,
            cell_radius: None,
            signature,
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.regions.len()
    }
}

/// Suggests a zoom for `bucket_count` groups holding `item_count` items.
///
/// The base factor steps down with the number of groups (1.0, 0.75, 0.5,
/// 0.25 for at most 2, 4, 6, or more groups) and is scaled by density: sparse
/// groups (at most 5 items on average) get 1.1x, dense ones down to 0.8x.
#[must_use]
pub fn suggest_auto_zoom(bucket_count: usize, item_count: usize) -> f64 {
    if bucket_count == 0 {
        return 1.0;
    }
    let base: f64 = match bucket_count {
        0..=2 => 1.0,
        3..=4 => 0.75,
        5..=6 => 0.5,
        _ => 0.25,
    };
    let density = item_count as f64 / bucket_count as f64;
    let density_factor = if density <= 5.0 {
        1.1
    } else if density <= 20.0 {
        1.0
    } else if density <= 50.0 {
        0.9
    } else {
        0.8
    };
    (base * density_factor).clamp(0.1, 1.0)
}

/// Lays out `items` as one honeycomb per group.
///
/// 1. `filters` narrows the items.
/// 2. `selector` partitions the rest into buckets (first-seen order).
/// 3. The area below the chrome band is tiled with [`grid_dimensions`] over
///    the bucket count; each bucket gets the centered
///    [`usable_fraction`](ClusterConfig::usable_fraction) of its tile.
/// 4. Every bucket is packed independently into its usable area with a
///    shared cell radius, then translated into place.
///
/// The result depends only on the arguments. An invalid `size` or empty
/// input yields no regions.
#[must_use]
pub fn cluster<'a>(
    items: &'a [MetricItem],
    selector: &(impl GroupKeySelector + ?Sized),
    filters: &FilterStack,
    size: Size,
    config: &ClusterConfig,
) -> ClusterLayout<'a> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "cluster",
        items = items.len(),
        filters = filters.len(),
        width = size.width,
        height = size.height
    )
    .entered();

    let filtered = filters.apply(items);
    let buckets = partition(&filtered, selector);
    let signature = GroupingSignature::of(&buckets);
    if buckets.is_empty() || !is_valid_area(size) {
        return ClusterLayout::empty(signature);
    }

    let chrome = size.height * config.chrome_fraction.clamp(0.0, 0.9);
    let tile_area = Rect::new(0.0, chrome, size.width, size.height);
    let dims = grid_dimensions(buckets.len(), tile_area.width() / tile_area.height());
    let tile = Size::new(
        tile_area.width() / dims.columns as f64,
        tile_area.height() / dims.rows as f64,
    );
    let usable_fraction = config.usable_fraction.clamp(0.05, 1.0);
    let usable = Size::new(tile.width * usable_fraction, tile.height * usable_fraction);
    let inset = Point::new(
        (tile.width - usable.width) / 2.0,
        (tile.height - usable.height) / 2.0,
    );

    let regions: Vec<GroupRegion> = buckets
        .iter()
        .enumerate()
        .map(|(group_id, bucket)| {
            let column = group_id % dims.columns;
            let row = group_id / dims.columns;
            GroupRegion {
                group_id,
                group_value: bucket.value.clone(),
                offset: Point::new(
                    tile_area.x0 + column as f64 * tile.width + inset.x,
                    tile_area.y0 + row as f64 * tile.height + inset.y,
                ),
                area: usable,
            }
        })
        .collect();

    let cell_radius = shared_radius(&buckets, usable, config.cell_radius);
    let mut cells = Vec::with_capacity(filtered.len());
    let mut anchors = Vec::with_capacity(buckets.len());
    if let Some(radius) = cell_radius {
        for (bucket, region) in buckets.iter().zip(&regions) {
            let start = cells.len();
            cells.extend(
                layout_honeycomb_refs(&bucket.items, usable, radius)
                    .into_iter()
                    .map(|cell| cell.translated(region.offset.x, region.offset.y)),
            );
            if let Some(anchor) = anchor_for(region, &cells[start..], radius) {
                anchors.push(anchor);
            }
        }
    } else {
        #[cfg(feature = "tracing")]
        tracing::debug!("no usable cell radius for grouped layout");
    }

    ClusterLayout {
        auto_zoom: suggest_auto_zoom(buckets.len(), filtered.len()),
        regions,
        cells,
        anchors,
        cell_radius,
        signature,
    }
}

/// One radius for every group, so cells compare visually across groups. In
/// auto mode the largest bucket decides.
///
/// The auto radius keeps its upper bound but not its lower one: every block
/// must fit its usable area, and the viewport zoom makes small cells legible.
fn shared_radius(buckets: &[Bucket<'_>], usable: Size, radius: CellRadius) -> Option<f64> {
    match radius {
        CellRadius::Fixed(_) => radius.resolve(0, usable),
        CellRadius::Auto(bounds) => {
            let fitting = RadiusBounds {
                min: 0.0,
                max: bounds.max.max(bounds.min),
            };
            buckets
                .iter()
                .filter_map(|bucket| auto_cell_radius(bucket.items.len(), usable, fitting))
                .min_by(f64::total_cmp)
        }
    }
}

fn anchor_for(
    region: &GroupRegion,
    cells: &[PositionedCell<'_>],
    radius: f64,
) -> Option<GroupAnchor> {
    let first = cells.first()?.center;
    let (min_x, max_x, min_y) = cells.iter().fold(
        (first.x, first.x, first.y),
        |(min_x, max_x, min_y), cell| {
            (
                min_x.min(cell.center.x),
                max_x.max(cell.center.x),
                min_y.min(cell.center.y),
            )
        },
    );
    Some(GroupAnchor {
        group_id: region.group_id,
        group_value: region.group_value.clone(),
        center_x: (min_x + max_x) / 2.0,
        top_edge_y: min_y - radius,
        cell_count: cells.len(),
    })
}
