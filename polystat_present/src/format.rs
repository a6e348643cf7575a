// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact value strings and tooltips.

use std::fmt::Write as _;

use polystat_grid::MetricItem;

/// Formats `value` with one decimal and a `K`/`M` suffix for large magnitudes.
///
/// ```
/// use polystat_present::format_value;
///
/// assert_eq!(format_value(999.0), "999.0");
/// assert_eq!(format_value(1500.0), "1.5K");
/// assert_eq!(format_value(2_300_000.0), "2.3M");
/// ```
#[must_use]
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.1}")
    }
}

/// Hover text for `item`: name, formatted value, then `key=value` labels in
/// key order, one per line.
#[must_use]
pub fn tooltip(item: &MetricItem) -> String {
    let mut text = format!("{}\n{}", item.name, format_value(item.value));
    for (key, value) in &item.labels {
        let _ = write!(text, "\n{key}={value}");
    }
    text
}
