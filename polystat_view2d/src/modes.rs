// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How fitted content should be positioned inside its target area.
///
/// [`crate::ViewportController::fit_to_content`] picks the mode per axis:
/// content that fits is centered, content that overflows a clustered view is
/// aligned to the top-left so the most significant cells stay visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Center the fitted content within the target area.
    #[default]
    Center,
    /// Align the minimum corner of the fitted content with the area origin.
    AlignMin,
}

/// Margin policy for [`crate::ViewportController::fit_to_content`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum FitStrategy {
    /// Equal margins on both axes, content centered in the whole view.
    #[default]
    Normal,
    /// Grouped honeycombs with externally drawn chrome above them.
    ///
    /// The top `chrome_height` logical pixels are reserved (as a vertical
    /// margin of at least the normal margin), a wider horizontal margin keeps
    /// clear of side panels, and content that does not fit the remaining area
    /// is aligned to its top-left corner instead of centered.
    Clustered {
        /// Estimated height of the header band drawn above the groups.
        chrome_height: f64,
    },
}
