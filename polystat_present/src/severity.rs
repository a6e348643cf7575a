// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold coloring relative to the value range of a dataset.

use peniko::Color;
use polystat_grid::MetricItem;

/// Classification of a value within its dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Lower part of the range.
    Normal,
    /// Middle part of the range.
    Warning,
    /// Upper part of the range.
    Critical,
}

/// Range fractions at which severities start.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeverityThresholds {
    /// Fraction of the range from which values are [`Severity::Warning`].
    pub warning: f64,
    /// Fraction of the range from which values are [`Severity::Critical`].
    pub critical: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            warning: 0.33,
            critical: 0.66,
        }
    }
}

/// Colors used for each severity.
#[derive(Clone, Copy, Debug)]
pub struct SeverityPalette {
    /// Fill of [`Severity::Normal`] cells.
    pub normal: Color,
    /// Fill of [`Severity::Warning`] cells.
    pub warning: Color,
    /// Fill of [`Severity::Critical`] cells.
    pub critical: Color,
    /// Fill of the "+N others" summary cell.
    pub summary: Color,
}

impl Default for SeverityPalette {
    fn default() -> Self {
        Self {
            normal: Color::from_rgb8(0x4c, 0xaf, 0x50),
            warning: Color::from_rgb8(0xff, 0xc1, 0x07),
            critical: Color::from_rgb8(0xf4, 0x43, 0x36),
            summary: Color::from_rgb8(0x78, 0x78, 0x78),
        }
    }
}

impl SeverityPalette {
    /// Color for `severity`.
    #[must_use]
    pub fn color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Normal => self.normal,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }
}

/// Finite min and max over the non-summary values of a dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl ValueRange {
    /// Range of `items`, ignoring summaries and non-finite values.
    ///
    /// Returns `None` if nothing qualifies.
    pub fn of<'a>(items: impl IntoIterator<Item = &'a MetricItem>) -> Option<Self> {
        items
            .into_iter()
            .filter(|item| !item.is_summary() && item.value.is_finite())
            .fold(None, |range: Option<Self>, item| {
                Some(match range {
                    None => Self {
                        min: item.value,
                        max: item.value,
                    },
                    Some(r) => Self {
                        min: r.min.min(item.value),
                        max: r.max.max(item.value),
                    },
                })
            })
    }

    /// Position of `value` in the range, or `None` for an empty range.
    #[must_use]
    pub fn ratio(&self, value: f64) -> Option<f64> {
        let span = self.max - self.min;
        (span > 0.0 && value.is_finite()).then(|| (value - self.min) / span)
    }
}

/// Classifies `value` against `range`.
///
/// A degenerate range (single value, all values equal) or a non-finite value
/// is [`Severity::Normal`].
#[must_use]
pub fn classify(value: f64, range: ValueRange, thresholds: &SeverityThresholds) -> Severity {
    match range.ratio(value) {
        Some(ratio) if ratio >= thresholds.critical => Severity::Critical,
        Some(ratio) if ratio >= thresholds.warning => Severity::Warning,
        _ => Severity::Normal,
    }
}

/// Assigns fill colors to the items of one dataset.
#[derive(Clone, Copy, Debug)]
pub struct Colorizer {
    palette: SeverityPalette,
    thresholds: SeverityThresholds,
    range: Option<ValueRange>,
}

impl Colorizer {
    /// Prepares coloring for `items`.
    pub fn new<'a>(
        items: impl IntoIterator<Item = &'a MetricItem>,
        palette: SeverityPalette,
        thresholds: SeverityThresholds,
    ) -> Self {
        Self {
            palette,
            thresholds,
            range: ValueRange::of(items),
        }
    }

    /// Range the colorizer classifies against.
    #[must_use]
    pub fn range(&self) -> Option<ValueRange> {
        self.range
    }

    /// Severity of `item`; `None` for summaries.
    #[must_use]
    pub fn severity(&self, item: &MetricItem) -> Option<Severity> {
        if item.is_summary() {
            return None;
        }
        Some(match self.range {
            Some(range) => classify(item.value, range, &self.thresholds),
            None => Severity::Normal,
        })
    }

    /// Fill color of `item`. An explicit item color wins.
    #[must_use]
    pub fn color(&self, item: &MetricItem) -> Color {
        if let Some(color) = item.explicit_color {
            return color;
        }
        match self.severity(item) {
            Some(severity) => self.palette.color(severity),
            None => self.palette.summary,
        }
    }
}
