// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting text lines into hexagons.

use polystat_grid::MetricItem;
use smallvec::SmallVec;

use crate::format::format_value;
use crate::measure::TextMeasurer;
use crate::tier::{DetailTier, hex_text_width};

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: char = '\u{2026}';

/// Tunables for [`fit_text`] and [`layout_cell_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextFitConfig {
    /// Factor applied per shrink step.
    pub shrink_step: f64,
    /// Stepwise shrinking stops at this fraction of the starting size.
    pub floor_fraction: f64,
    /// Smallest font size ever produced, in pixels.
    pub min_font_size: f64,
    /// Largest starting font size, in pixels.
    pub max_font_size: f64,
    /// Starting font size per pixel of on-screen cell radius.
    pub size_per_radius: f64,
    /// Line advance as a multiple of the font size.
    pub line_height: f64,
    /// Zoom progress past which the fourth text line is shown.
    pub fourth_line_progress: f64,
}

impl Default for TextFitConfig {
    fn default() -> Self {
        Self {
            shrink_step: 0.9,
            floor_fraction: 0.4,
            min_font_size: 4.0,
            max_font_size: 28.0,
            size_per_radius: 0.3,
            line_height: 1.2,
            fourth_line_progress: 0.5,
        }
    }
}

/// Text fitted to a width.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedText {
    /// Text to draw; ends with [`ELLIPSIS`] when truncated.
    pub text: String,
    /// Font size to draw it at.
    pub font_size: f64,
    /// Whether characters were dropped.
    pub truncated: bool,
}

/// Fits `text` into `max_width`, starting at `start_size`.
///
/// 1. Shrink by [`shrink_step`](TextFitConfig::shrink_step) until the text
///    fits or the floor `max(floor_fraction * start_size, min_font_size)` is
///    reached.
/// 2. Otherwise scale the size down proportionally to the overflow once.
/// 3. If that would go below [`min_font_size`](TextFitConfig::min_font_size),
///    keep the minimum size and cut the text, appending an ellipsis.
///
/// Nothing fits a non-positive or non-finite width; the result is then empty
/// and marked truncated.
pub fn fit_text(
    measurer: &mut impl TextMeasurer,
    text: &str,
    start_size: f64,
    max_width: f64,
    config: &TextFitConfig,
) -> FittedText {
    let min_size = config.min_font_size.max(f64::MIN_POSITIVE);
    if !max_width.is_finite() || max_width <= 0.0 {
        return FittedText {
            text: String::new(),
            font_size: min_size,
            truncated: !text.is_empty(),
        };
    }
    let start = if start_size.is_finite() {
        start_size.max(min_size)
    } else {
        min_size
    };
    let floor = (start * config.floor_fraction).max(min_size);
    let step = if config.shrink_step > 0.0 && config.shrink_step < 1.0 {
        config.shrink_step
    } else {
        0.9
    };

    let mut size = start;
    let mut width = measurer.measure(text, size);
    while width > max_width && size > floor {
        size = (size * step).max(floor);
        width = measurer.measure(text, size);
    }
    if width <= max_width {
        return FittedText {
            text: text.to_owned(),
            font_size: size,
            truncated: false,
        };
    }

    let proportional = size * max_width / width;
    if proportional >= min_size {
        return FittedText {
            text: text.to_owned(),
            font_size: proportional,
            truncated: false,
        };
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(text, max_width, "truncating label at minimum font size");
    FittedText {
        text: truncate_to_width(measurer, text, min_size, max_width),
        font_size: min_size,
        truncated: true,
    }
}

/// Longest prefix of `text` that, followed by [`ELLIPSIS`], fits `max_width`.
fn truncate_to_width(
    measurer: &mut impl TextMeasurer,
    text: &str,
    font_size: f64,
    max_width: f64,
) -> String {
    let ends: Vec<usize> = text.char_indices().map(|(i, _)| i).skip(1).collect();
    let candidate = |end: usize| {
        let mut s = String::with_capacity(end + ELLIPSIS.len_utf8());
        s.push_str(&text[..end]);
        s.push(ELLIPSIS);
        s
    };
    // Binary search for the last prefix boundary that fits; width grows with
    // prefix length.
    let (mut lo, mut hi) = (0, ends.len());
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if measurer.measure(&candidate(ends[mid - 1]), font_size) <= max_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    if lo > 0 {
        return candidate(ends[lo - 1]);
    }
    let ellipsis = ELLIPSIS.to_string();
    if measurer.measure(&ellipsis, font_size) <= max_width {
        ellipsis
    } else {
        String::new()
    }
}

/// Role of a text line within a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Metric name.
    Name,
    /// A `key=value` label.
    Label,
    /// Formatted value.
    Value,
}

/// One fitted line of cell text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// What the line shows.
    pub role: LineRole,
    /// Fitted content and size.
    pub fitted: FittedText,
    /// Baseline-center offset from the cell center, in screen pixels.
    pub dy: f64,
}

/// Lines of one cell; inline for the common case.
pub type TextLines = SmallVec<[TextLine; 5]>;

/// Most label lines shown in a [`DetailTier::Full`] cell.
const MAX_LABEL_LINES: usize = 3;

/// Content lines for `item` at `tier`, before fitting.
///
/// [`DetailTier::Full`] shows the name, up to three labels, and the value; the
/// third label (fourth line) only once `zoom_progress` passes
/// [`fourth_line_progress`](TextFitConfig::fourth_line_progress).
#[must_use]
pub fn cell_text_content(
    item: &MetricItem,
    tier: DetailTier,
    zoom_progress: f64,
    config: &TextFitConfig,
) -> SmallVec<[(LineRole, String); 5]> {
    let mut lines = SmallVec::new();
    match tier {
        DetailTier::Hidden => {}
        DetailTier::OneLine => lines.push((LineRole::Name, item.name.clone())),
        DetailTier::TwoLines => {
            lines.push((LineRole::Name, item.name.clone()));
            lines.push((LineRole::Value, format_value(item.value)));
        }
        DetailTier::Full => {
            lines.push((LineRole::Name, item.name.clone()));
            let label_lines = if zoom_progress > config.fourth_line_progress {
                MAX_LABEL_LINES
            } else {
                MAX_LABEL_LINES - 1
            };
            lines.extend(
                item.labels
                    .iter()
                    .take(label_lines)
                    .map(|(k, v)| (LineRole::Label, format!("{k}={v}"))),
            );
            lines.push((LineRole::Value, format_value(item.value)));
        }
    }
    lines
}

/// Chooses, fits, and stacks the text of a cell drawn with `screen_radius`.
///
/// Lines are centered vertically around the cell center; each is fitted to
/// the hex width at its own offset, see [`hex_text_width`].
pub fn layout_cell_text(
    measurer: &mut impl TextMeasurer,
    item: &MetricItem,
    screen_radius: f64,
    zoom_progress: f64,
    config: &TextFitConfig,
) -> TextLines {
    let tier = DetailTier::for_screen_radius(screen_radius);
    let content = cell_text_content(item, tier, zoom_progress, config);
    if content.is_empty() {
        return TextLines::new();
    }

    let start_size = (screen_radius * config.size_per_radius)
        .min(config.max_font_size)
        .max(config.min_font_size);
    let advance = start_size * config.line_height;
    let first_dy = -advance * (content.len() - 1) as f64 / 2.0;

    content
        .into_iter()
        .enumerate()
        .map(|(i, (role, text))| {
            let dy = first_dy + advance * i as f64;
            let width = hex_text_width(screen_radius, dy);
            TextLine {
                role,
                fitted: fit_text(measurer, &text, start_size, width, config),
                dy,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use polystat_grid::MetricItem;
    use proptest::prelude::*;

    use super::{
        ELLIPSIS, LineRole, TextFitConfig, cell_text_content, fit_text, layout_cell_text,
    };
    use crate::measure::{MonospaceMeasurer, TextMeasurer};
    use crate::tier::{DetailTier, hex_text_width};

    fn mono() -> MonospaceMeasurer {
        MonospaceMeasurer { advance: 0.5 }
    }

    #[test]
    fn fitting_text_keeps_start_size() {
        let fitted = fit_text(&mut mono(), "cpu", 10.0, 100.0, &TextFitConfig::default());
        assert_eq!(fitted.font_size, 10.0);
        assert!(!fitted.truncated);
    }

    #[test]
    fn steps_down_until_it_fits() {
        // 10 chars at 0.5 => width = 5 * size. 40px fits at size <= 8, which
        // takes three steps from 10.
        let fitted = fit_text(&mut mono(), "abcdefghij", 10.0, 40.0, &TextFitConfig::default());
        assert!((fitted.font_size - 10.0 * 0.9 * 0.9 * 0.9).abs() < 1e-9);
        assert_eq!(fitted.text, "abcdefghij");
    }

    #[test]
    fn proportional_shrink_after_floor() {
        // Floor is max(0.4 * 20, 4) = 8; at 8 the text is 40 wide, 30 allowed.
        let fitted = fit_text(&mut mono(), "abcdefghij", 20.0, 30.0, &TextFitConfig::default());
        assert!((fitted.font_size - 6.0).abs() < 1e-9);
        assert!(!fitted.truncated);
        let mut m = mono();
        assert!(m.measure(&fitted.text, fitted.font_size) <= 30.0 + 1e-9);
    }

    #[test]
    fn truncates_below_minimum() {
        // At 4px each char is 2 wide; 9px holds three chars plus the ellipsis.
        let fitted = fit_text(&mut mono(), "abcdefghij", 10.0, 9.0, &TextFitConfig::default());
        assert!(fitted.truncated);
        assert_eq!(fitted.font_size, 4.0);
        assert_eq!(fitted.text, format!("abc{ELLIPSIS}"));
    }

    #[test]
    fn nothing_fits_nowhere() {
        let config = TextFitConfig::default();
        let fitted = fit_text(&mut mono(), "abc", 10.0, 0.0, &config);
        assert!(fitted.text.is_empty() && fitted.truncated);
        let fitted = fit_text(&mut mono(), "abc", 10.0, 1.0, &config);
        assert!(fitted.text.is_empty() && fitted.truncated);
    }

    #[test]
    fn content_follows_tier() {
        let item = MetricItem::new("load", 1500.0)
            .with_label("a", "1")
            .with_label("b", "2")
            .with_label("c", "3")
            .with_label("d", "4");
        let config = TextFitConfig::default();
        let roles = |tier, progress| {
            cell_text_content(&item, tier, progress, &config)
                .into_iter()
                .map(|(role, _)| role)
                .collect::<Vec<_>>()
        };
        assert!(roles(DetailTier::Hidden, 1.0).is_empty());
        assert_eq!(roles(DetailTier::OneLine, 1.0), [LineRole::Name]);
        assert_eq!(roles(DetailTier::TwoLines, 1.0), [LineRole::Name, LineRole::Value]);
        assert_eq!(
            roles(DetailTier::Full, 0.2),
            [LineRole::Name, LineRole::Label, LineRole::Label, LineRole::Value]
        );
        let full = cell_text_content(&item, DetailTier::Full, 0.9, &config);
        assert_eq!(full.len(), 5);
        assert_eq!(full[3].1, "c=3");
        assert_eq!(full[4].1, "1.5K");
    }

    #[test]
    fn lines_fit_their_hex_width() {
        let item = MetricItem::new("a_rather_long_metric_name_total", 42.0)
            .with_label("instance", "node-0001.example.org:9100")
            .with_label("job", "node");
        let config = TextFitConfig::default();
        let mut m = mono();
        for screen_radius in [3.0, 10.0, 30.0, 80.0] {
            let lines = layout_cell_text(&mut m, &item, screen_radius, 1.0, &config);
            let tier = DetailTier::for_screen_radius(screen_radius);
            assert_eq!(lines.is_empty(), tier.is_hidden());
            for line in &lines {
                let width = m.measure(&line.fitted.text, line.fitted.font_size);
                assert!(width <= hex_text_width(screen_radius, line.dy) + 1e-9);
                assert!(line.fitted.font_size >= config.min_font_size);
            }
            // Stacked symmetrically around the center.
            if let (Some(first), Some(last)) = (lines.first(), lines.last()) {
                assert!((first.dy + last.dy).abs() < 1e-9);
            }
        }
    }

    proptest! {
        #[test]
        fn fitted_text_never_overflows(
            text in "[a-z_.:]{0,40}",
            start in 1.0_f64..40.0,
            max_width in 1.0_f64..300.0,
        ) {
            let config = TextFitConfig::default();
            let mut measurer = mono();
            let fitted = fit_text(&mut measurer, &text, start, max_width, &config);
            prop_assert!(fitted.font_size >= config.min_font_size);
            let width = measurer.measure(&fitted.text, fitted.font_size);
            prop_assert!(width <= max_width * (1.0 + 1e-9));
            if fitted.truncated {
                prop_assert_eq!(fitted.font_size, config.min_font_size);
            } else {
                prop_assert_eq!(&fitted.text, &text);
            }
        }
    }
}
