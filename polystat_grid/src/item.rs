// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metric records and their positioned counterparts.

use std::collections::BTreeMap;

use kurbo::Point;
use peniko::Color;

/// Distinguishes real metrics from synthetic entries added by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ItemKind {
    /// A metric sample produced by the query layer.
    #[default]
    Metric,
    /// The "+N others" entry standing in for items dropped by a display cap.
    Summary {
        /// Number of items this entry replaces.
        hidden: usize,
    },
}

/// A single named metric sample.
///
/// Items are immutable for the duration of a render cycle. Labels are kept in
/// an ordered map so that tooltips and grouping are deterministic.
#[derive(Clone, Debug)]
pub struct MetricItem {
    /// Metric name (for Prometheus results, the `__name__` label).
    pub name: String,
    /// Sample value.
    pub value: f64,
    /// Remaining labels of the series.
    pub labels: BTreeMap<String, String>,
    /// Sample timestamp in Unix seconds.
    pub timestamp: f64,
    /// Color overriding threshold classification, if any.
    pub explicit_color: Option<Color>,
    /// Whether this is a real metric or a synthetic summary.
    pub kind: ItemKind,
}

impl MetricItem {
    /// Creates a metric with no labels, a zero timestamp and no explicit color.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            labels: BTreeMap::new(),
            timestamp: 0.0,
            explicit_color: None,
            kind: ItemKind::Metric,
        }
    }

    /// Creates the "+N others" entry summarizing `hidden` dropped items whose
    /// values add up to `value`.
    #[must_use]
    pub fn summary(hidden: usize, value: f64) -> Self {
        Self {
            kind: ItemKind::Summary { hidden },
            ..Self::new(format!("+{hidden} others"), value)
        }
    }

    /// Adds a label, returning the updated item.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Sets the sample timestamp, returning the updated item.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets an explicit color, returning the updated item.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.explicit_color = Some(color);
        self
    }

    /// Returns the value of label `key`, if present.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Returns `true` for the synthetic "+N others" entry.
    #[must_use]
    pub fn is_summary(&self) -> bool {
        matches!(self.kind, ItemKind::Summary { .. })
    }
}

/// A metric placed at a honeycomb coordinate.
///
/// `center` lives in the shared logical space, before any zoom or pan is
/// applied.
#[derive(Clone, Copy, Debug)]
pub struct PositionedCell<'a> {
    /// Column inside the honeycomb block.
    pub column: u32,
    /// Row inside the honeycomb block.
    pub row: u32,
    /// Cell center in logical coordinates.
    pub center: Point,
    /// The metric drawn in this cell.
    pub item: &'a MetricItem,
}

impl PositionedCell<'_> {
    /// Returns this cell translated by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            center: Point::new(
                crate::finite_or_zero(self.center.x + dx),
                crate::finite_or_zero(self.center.y + dy),
            ),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemKind, MetricItem};

    #[test]
    fn summary_item_names_hidden_count() {
        let item = MetricItem::summary(42, 10.0);
        assert_eq!(item.name, "+42 others");
        assert_eq!(item.kind, ItemKind::Summary { hidden: 42 });
        assert!(item.is_summary());
    }

    #[test]
    fn labels_are_queryable() {
        let item = MetricItem::new("up", 1.0)
            .with_label("job", "node")
            .with_label("instance", "a:9100");
        assert_eq!(item.label("job"), Some("node"));
        assert_eq!(item.label("missing"), None);
        assert!(!item.is_summary());
    }
}
