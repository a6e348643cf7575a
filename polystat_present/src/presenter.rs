// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;
use polystat_grid::MetricItem;

use crate::fit::{TextFitConfig, TextLines, layout_cell_text};
use crate::format::tooltip;
use crate::measure::{DEFAULT_CACHE_CAPACITY, MeasureCache, TextMeasurer};
use crate::severity::Colorizer;
use crate::tier::DetailTier;

/// Everything a renderer needs to draw one cell, apart from its position.
#[derive(Clone, Debug)]
pub struct CellPresentation {
    /// Fill color.
    pub color: Color,
    /// Text detail chosen for the on-screen size.
    pub tier: DetailTier,
    /// Fitted text, top to bottom.
    pub lines: TextLines,
    /// Hover text.
    pub tooltip: String,
}

/// Presents cells through a cached text measurer.
#[derive(Clone, Debug)]
pub struct CellPresenter<M> {
    cache: MeasureCache<M>,
    config: TextFitConfig,
}

impl<M: TextMeasurer> CellPresenter<M> {
    /// Creates a presenter measuring with `measurer`.
    pub fn new(measurer: M, config: TextFitConfig) -> Self {
        Self {
            cache: MeasureCache::new(measurer, DEFAULT_CACHE_CAPACITY),
            config,
        }
    }

    /// Text fitting configuration.
    #[must_use]
    pub fn config(&self) -> &TextFitConfig {
        &self.config
    }

    /// The measurement cache.
    pub fn cache_mut(&mut self) -> &mut MeasureCache<M> {
        &mut self.cache
    }

    /// Presents `item` drawn with logical `radius` at `zoom`.
    ///
    /// `zoom_progress` is the position of `zoom` within the zoom bounds, in
    /// `[0, 1]`.
    pub fn present(
        &mut self,
        item: &MetricItem,
        colorizer: &Colorizer,
        radius: f64,
        zoom: f64,
        zoom_progress: f64,
    ) -> CellPresentation {
        let screen_radius = radius * zoom;
        CellPresentation {
            color: colorizer.color(item),
            tier: DetailTier::for_screen_radius(screen_radius),
            lines: layout_cell_text(
                &mut self.cache,
                item,
                screen_radius,
                zoom_progress,
                &self.config,
            ),
            tooltip: tooltip(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use polystat_grid::MetricItem;

    use super::CellPresenter;
    use crate::{
        Colorizer, DetailTier, MonospaceMeasurer, SeverityPalette, SeverityThresholds,
        TextFitConfig,
    };

    #[test]
    fn zooming_in_reveals_more_text() {
        let items = [MetricItem::new("http_requests", 1200.0).with_label("code", "200")];
        let colorizer = Colorizer::new(&items, SeverityPalette::default(), SeverityThresholds::default());
        let mut presenter = CellPresenter::new(MonospaceMeasurer::default(), TextFitConfig::default());

        let far = presenter.present(&items[0], &colorizer, 20.0, 0.2, 0.0);
        assert_eq!(far.tier, DetailTier::Hidden);
        assert!(far.lines.is_empty());
        assert!(far.tooltip.starts_with("http_requests\n1.2K"));

        let mid = presenter.present(&items[0], &colorizer, 20.0, 1.5, 0.4);
        assert_eq!(mid.tier, DetailTier::TwoLines);
        assert_eq!(mid.lines.len(), 2);

        let near = presenter.present(&items[0], &colorizer, 20.0, 4.0, 0.9);
        assert_eq!(near.tier, DetailTier::Full);
        assert_eq!(near.lines.len(), 3);
    }

    #[test]
    fn repeated_frames_hit_the_cache() {
        let items = [MetricItem::new("up", 1.0)];
        let colorizer = Colorizer::new(&items, SeverityPalette::default(), SeverityThresholds::default());
        let mut presenter = CellPresenter::new(MonospaceMeasurer::default(), TextFitConfig::default());
        presenter.present(&items[0], &colorizer, 30.0, 1.0, 0.5);
        let misses = presenter.cache_mut().stats().misses;
        presenter.present(&items[0], &colorizer, 30.0, 1.0, 0.5);
        assert_eq!(presenter.cache_mut().stats().misses, misses);
        assert!(presenter.cache_mut().stats().hits > 0);
    }
}
