// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use polystat_grid::{MetricItem, significance_order};

/// Limits `items` to `max` entries.
///
/// When there are more, the `max - 1` most significant items (value
/// descending, stable for ties) are kept in that order and a trailing
/// [`MetricItem::summary`] stands in for the rest, carrying their count and
/// the sum of their finite values.
#[must_use]
pub fn cap_items(items: Vec<MetricItem>, max: usize) -> Vec<MetricItem> {
    if items.len() <= max {
        return items;
    }
    if max == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| significance_order(&items[a], &items[b]));

    let mut slots: Vec<Option<MetricItem>> = items.into_iter().map(Some).collect();
    let keep = max - 1;
    let mut capped: Vec<MetricItem> = order[..keep]
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();
    let hidden = order.len() - keep;
    let hidden_sum: f64 = order[keep..]
        .iter()
        .filter_map(|&i| slots[i].as_ref())
        .map(|item| item.value)
        .filter(|v| v.is_finite())
        .sum();

    #[cfg(feature = "tracing")]
    tracing::debug!(kept = keep, hidden, "capped items");
    capped.push(MetricItem::summary(hidden, hidden_sum));
    capped
}

#[cfg(test)]
mod tests {
    use polystat_grid::{ItemKind, MetricItem};

    use super::cap_items;

    fn items(values: &[f64]) -> Vec<MetricItem> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| MetricItem::new(format!("m{i}"), *v))
            .collect()
    }

    #[test]
    fn below_cap_is_untouched() {
        let capped = cap_items(items(&[1.0, 3.0, 2.0]), 3);
        let names: Vec<&str> = capped.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["m0", "m1", "m2"]);
    }

    #[test]
    fn overflow_becomes_summary() {
        let capped = cap_items(items(&[1.0, 5.0, 3.0, 4.0, 2.0]), 3);
        let names: Vec<&str> = capped.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["m1", "m3", "+3 others"]);
        let summary = &capped[2];
        assert_eq!(summary.kind, ItemKind::Summary { hidden: 3 });
        assert_eq!(summary.value, 1.0 + 3.0 + 2.0);
    }

    #[test]
    fn ties_keep_input_order_and_nan_is_not_summed() {
        let capped = cap_items(items(&[2.0, 2.0, 2.0, f64::NAN]), 3);
        let names: Vec<&str> = capped.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names[..2], ["m0", "m1"]);
        assert_eq!(capped[2].value, 2.0);
    }

    #[test]
    fn tiny_caps() {
        assert!(cap_items(items(&[1.0, 2.0]), 0).is_empty());
        let one = cap_items(items(&[1.0, 2.0]), 1);
        assert_eq!(one.len(), 1);
        assert!(one[0].is_summary());
    }
}
