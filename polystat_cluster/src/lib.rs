// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polystat Cluster: grouped honeycombs with drill-down.
//!
//! Grouped mode splits the visible items by a label (or any
//! [`GroupKeySelector`]) and lays out one honeycomb per group. Groups tile the
//! area below a band reserved for group headers, which the host draws at the
//! returned [`GroupAnchor`]s.
//!
//! - [`FilterStack`]: nested drill-down selections, applied before grouping.
//! - [`partition`]: first-seen-order buckets, with [`MISSING_GROUP_VALUE`]
//!   for items lacking the label.
//! - [`cluster`]: regions, cells, anchors, and a suggested zoom.
//! - [`GroupingSignature`]: the set of group values, so a viewport can tell a
//!   regrouping from a plain data refresh.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use polystat_cluster::{ByLabel, ClusterConfig, FilterStack, cluster};
//! use polystat_grid::MetricItem;
//!
//! let items = vec![
//!     MetricItem::new("api-1", 3.0).with_label("env", "prod"),
//!     MetricItem::new("api-2", 5.0).with_label("env", "prod"),
//!     MetricItem::new("api-3", 1.0).with_label("env", "dev"),
//! ];
//! let layout = cluster(
//!     &items,
//!     &ByLabel::new("env"),
//!     &FilterStack::new(),
//!     Size::new(900.0, 600.0),
//!     &ClusterConfig::default(),
//! );
//! assert_eq!(layout.group_count(), 2);
//! assert_eq!(layout.anchors[0].group_value, "prod");
//! ```

mod filter;
mod group;
mod layout;

pub use filter::{FilterEntry, FilterStack};
pub use group::{Bucket, ByLabel, GroupKeySelector, GroupingSignature, MISSING_GROUP_VALUE, partition};
pub use layout::{ClusterConfig, ClusterLayout, GroupAnchor, GroupRegion, cluster, suggest_auto_zoom};
