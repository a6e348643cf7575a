// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drill-down history.

use polystat_grid::MetricItem;

/// One drill-down selection: keep items whose `label_key` equals `label_value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterEntry {
    /// Label to match.
    pub label_key: String,
    /// Required label value.
    pub label_value: String,
    /// Position of this entry in its stack.
    pub level: usize,
}

impl FilterEntry {
    /// Returns `true` if `item` carries the selected label value.
    #[must_use]
    pub fn matches(&self, item: &MetricItem) -> bool {
        item.label(&self.label_key) == Some(self.label_value.as_str())
    }
}

/// Ordered history of nested drill-down selections.
///
/// The entry at index `i` always has `level == i`. Building a stack from a
/// list of entries, including through serde, renumbers their levels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<FilterEntry>", into = "Vec<FilterEntry>")
)]
pub struct FilterStack {
    entries: Vec<FilterEntry>,
}

impl FilterStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drills into `key == value`. The new entry's level is the previous length.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &FilterEntry {
        let level = self.entries.len();
        self.entries.push(FilterEntry {
            label_key: key.into(),
            label_value: value.into(),
            level,
        });
        &self.entries[level]
    }

    /// Removes and returns the innermost selection.
    pub fn pop(&mut self) -> Option<FilterEntry> {
        self.entries.pop()
    }

    /// Keeps only the first `level` entries (breadcrumb navigation).
    pub fn truncate(&mut self, level: usize) {
        self.entries.truncate(level);
    }

    /// Removes every selection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no selections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selections from outermost to innermost.
    #[must_use]
    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    /// Iterates selections from outermost to innermost.
    pub fn iter(&self) -> core::slice::Iter<'_, FilterEntry> {
        self.entries.iter()
    }

    /// Returns `true` if `item` passes every selection.
    #[must_use]
    pub fn matches(&self, item: &MetricItem) -> bool {
        self.entries.iter().all(|entry| entry.matches(item))
    }

    /// Items passing every selection, in input order.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [MetricItem]) -> Vec<&'a MetricItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

impl From<Vec<FilterEntry>> for FilterStack {
    fn from(mut entries: Vec<FilterEntry>) -> Self {
        for (level, entry) in entries.iter_mut().enumerate() {
            entry.level = level;
        }
        Self { entries }
    }
}

impl From<FilterStack> for Vec<FilterEntry> {
    fn from(stack: FilterStack) -> Self {
        stack.entries
    }
}

impl<'a> IntoIterator for &'a FilterStack {
    type Item = &'a FilterEntry;
    type IntoIter = core::slice::Iter<'a, FilterEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
