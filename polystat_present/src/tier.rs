// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! How much text a cell shows, and how wide its text can be.

use polystat_grid::SQRT_3;

/// Amount of text drawn in a cell, chosen from its on-screen radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetailTier {
    /// No text. The cell is still drawn and hit-tested.
    Hidden,
    /// Name only.
    OneLine,
    /// Name and value.
    TwoLines,
    /// Name, up to three label lines, and value.
    Full,
}

impl DetailTier {
    /// On-screen radius (logical radius times zoom) below which text is hidden.
    pub const HIDDEN_BELOW: f64 = 6.0;
    /// On-screen radius below which only the name is shown.
    pub const ONE_LINE_BELOW: f64 = 25.0;
    /// On-screen radius below which name and value are shown.
    pub const TWO_LINES_BELOW: f64 = 50.0;

    /// Tier for a cell whose radius is `screen_radius` pixels.
    #[must_use]
    pub fn for_screen_radius(screen_radius: f64) -> Self {
        if screen_radius.is_nan() || screen_radius < Self::HIDDEN_BELOW {
            Self::Hidden
        } else if screen_radius < Self::ONE_LINE_BELOW {
            Self::OneLine
        } else if screen_radius < Self::TWO_LINES_BELOW {
            Self::TwoLines
        } else {
            Self::Full
        }
    }

    /// Returns `true` if no text is drawn.
    #[must_use]
    pub fn is_hidden(self) -> bool {
        self == Self::Hidden
    }
}

/// Usable text width at vertical offset `dy` from the center of a pointy-top
/// hexagon of radius `radius`.
///
/// Near the middle (within 30% of the radius) text may use 85% of the hex
/// width; from 60% outwards only 60%, where the slanted edges close in.
/// Between the two the fraction falls linearly.
#[must_use]
pub fn hex_text_width(radius: f64, dy: f64) -> f64 {
    if !radius.is_finite() || radius <= 0.0 {
        return 0.0;
    }
    let width = radius * SQRT_3;
    let t = if dy.is_finite() { dy.abs() / radius } else { 1.0 };
    let fraction = if t <= 0.3 {
        0.85
    } else if t >= 0.6 {
        0.6
    } else {
        0.85 - (t - 0.3) / 0.3 * 0.25
    };
    width * fraction
}
