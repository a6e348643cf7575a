// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioning items into ordered buckets.

use std::borrow::Cow;
use std::hash::{DefaultHasher, Hash, Hasher};

use hashbrown::HashMap;
use polystat_grid::MetricItem;

/// Bucket value for items lacking the grouping label.
pub const MISSING_GROUP_VALUE: &str = "unknown";

/// Chooses the bucket an item belongs to.
pub trait GroupKeySelector {
    /// Bucket value for `item`.
    fn group_value<'a>(&self, item: &'a MetricItem) -> Cow<'a, str>;
}

/// Groups by the value of a label; items without it land in
/// [`MISSING_GROUP_VALUE`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByLabel(pub String);

impl ByLabel {
    /// Groups by label `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl GroupKeySelector for ByLabel {
    fn group_value<'a>(&self, item: &'a MetricItem) -> Cow<'a, str> {
        Cow::Borrowed(item.label(&self.0).unwrap_or(MISSING_GROUP_VALUE))
    }
}

impl<F> GroupKeySelector for F
where
    F: Fn(&MetricItem) -> String,
{
    fn group_value<'a>(&self, item: &'a MetricItem) -> Cow<'a, str> {
        Cow::Owned(self(item))
    }
}

/// Items sharing one group value.
#[derive(Clone, Debug)]
pub struct Bucket<'a> {
    /// The shared group value.
    pub value: String,
    /// Members, in input order.
    pub items: Vec<&'a MetricItem>,
}

/// Splits `items` into buckets ordered by first appearance of each value.
#[must_use]
pub fn partition<'a>(
    items: &[&'a MetricItem],
    selector: &(impl GroupKeySelector + ?Sized),
) -> Vec<Bucket<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket<'a>> = Vec::new();
    for &item in items {
        let value = selector.group_value(item);
        match index.get(value.as_ref()) {
            Some(&slot) => buckets[slot].items.push(item),
            None => {
                let value = value.into_owned();
                index.insert(value.clone(), buckets.len());
                buckets.push(Bucket {
                    value,
                    items: vec![item],
                });
            }
        }
    }
    buckets
}

/// Order-independent identity of a grouping: its sorted bucket values.
///
/// Two cluster passes with equal signatures produced the same set of groups,
/// so the view does not need to recenter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupingSignature(Vec<String>);

impl GroupingSignature {
    /// Builds the signature of `buckets`.
    #[must_use]
    pub fn of(buckets: &[Bucket<'_>]) -> Self {
        let mut values: Vec<String> = buckets.iter().map(|b| b.value.clone()).collect();
        values.sort_unstable();
        Self(values)
    }

    /// Sorted bucket values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// 64-bit digest for change detection within one process.
    ///
    /// Not stable across builds or toolchains; persist [`values`](Self::values)
    /// instead.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use polystat_grid::MetricItem;

    use super::{ByLabel, GroupingSignature, MISSING_GROUP_VALUE, partition};

    #[test]
    fn buckets_keep_first_seen_order() {
        let items = [
            MetricItem::new("a", 1.0).with_label("job", "db"),
            MetricItem::new("b", 1.0).with_label("job", "api"),
            MetricItem::new("c", 1.0).with_label("job", "db"),
            MetricItem::new("d", 1.0),
        ];
        let refs: Vec<&MetricItem> = items.iter().collect();
        let buckets = partition(&refs, &ByLabel::new("job"));
        let values: Vec<&str> = buckets.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, ["db", "api", MISSING_GROUP_VALUE]);
        assert_eq!(buckets[0].items.len(), 2);
    }

    #[test]
    fn closures_select_groups() {
        let items = [MetricItem::new("cpu_user", 1.0), MetricItem::new("mem_free", 1.0)];
        let refs: Vec<&MetricItem> = items.iter().collect();
        let prefix = |item: &MetricItem| item.name.split('_').next().unwrap_or("").to_owned();
        let buckets = partition(&refs, &prefix);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].value, "mem");
    }

    #[test]
    fn signature_ignores_bucket_order() {
        let a = [
            MetricItem::new("a", 1.0).with_label("k", "x"),
            MetricItem::new("b", 1.0).with_label("k", "y"),
        ];
        let b = [a[1].clone(), a[0].clone()];
        let ra: Vec<&MetricItem> = a.iter().collect();
        let rb: Vec<&MetricItem> = b.iter().collect();
        let sa = GroupingSignature::of(&partition(&ra, &ByLabel::new("k")));
        let sb = GroupingSignature::of(&partition(&rb, &ByLabel::new("k")));
        assert_eq!(sa, sb);
        assert_eq!(sa.fingerprint(), sb.fingerprint());
        assert_eq!(sa.values(), ["x", "y"]);
    }

    #[test]
    fn fingerprint_tracks_group_changes() {
        let items = [
            MetricItem::new("a", 1.0).with_label("k", "x"),
            MetricItem::new("b", 1.0).with_label("k", "y"),
        ];
        let refs: Vec<&MetricItem> = items.iter().collect();
        let both = GroupingSignature::of(&partition(&refs, &ByLabel::new("k")));
        let one = GroupingSignature::of(&partition(&refs[..1], &ByLabel::new("k")));
        assert_ne!(both, one);
        assert_ne!(both.fingerprint(), one.fingerprint());
        assert_eq!(both.fingerprint(), both.clone().fingerprint());
    }
}
