// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polystat Present: what each honeycomb cell looks like.
//!
//! Given a positioned cell, its dataset, and the current zoom, this crate
//! decides the fill color and the text a renderer should draw:
//!
//! - [`Colorizer`]: severity classification relative to the dataset's value
//!   range ([`SeverityThresholds`]), mapped through a [`SeverityPalette`].
//!   Explicit item colors win; the "+N others" summary is neutral.
//! - [`DetailTier`]: hidden, one line, two lines, or full detail, chosen from
//!   the on-screen cell radius.
//! - [`fit_text`]: shrink-then-truncate fitting of one line into the usable
//!   width of a hexagon at its vertical offset ([`hex_text_width`]).
//! - [`MeasureCache`]: bounded memo in front of the host's [`TextMeasurer`].
//! - [`format_value`] and [`tooltip`]: compact strings.
//!
//! [`CellPresenter`] combines them per cell.
//!
//! ## Minimal example
//!
//! ```rust
//! use polystat_grid::MetricItem;
//! use polystat_present::{
//!     CellPresenter, Colorizer, DetailTier, MonospaceMeasurer, SeverityPalette,
//!     SeverityThresholds, TextFitConfig,
//! };
//!
//! let items = vec![MetricItem::new("cpu", 10.0), MetricItem::new("mem", 90.0)];
//! let colorizer = Colorizer::new(&items, SeverityPalette::default(), SeverityThresholds::default());
//! let mut presenter = CellPresenter::new(MonospaceMeasurer::default(), TextFitConfig::default());
//!
//! // Radius 20 at zoom 2 is 40 px on screen: name and value.
//! let cell = presenter.present(&items[1], &colorizer, 20.0, 2.0, 0.5);
//! assert_eq!(cell.tier, DetailTier::TwoLines);
//! assert_eq!(cell.lines[1].fitted.text, "90.0");
//! ```

mod fit;
mod format;
mod measure;
mod presenter;
mod severity;
mod tier;

pub use fit::{
    ELLIPSIS, FittedText, LineRole, TextFitConfig, TextLine, TextLines, cell_text_content,
    fit_text, layout_cell_text,
};
pub use format::{format_value, tooltip};
pub use measure::{CacheStats, DEFAULT_CACHE_CAPACITY, MeasureCache, MonospaceMeasurer, TextMeasurer};
pub use presenter::{CellPresentation, CellPresenter};
pub use severity::{
    Colorizer, Severity, SeverityPalette, SeverityThresholds, ValueRange, classify,
};
pub use tier::{DetailTier, hex_text_width};
