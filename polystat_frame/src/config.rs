// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use polystat_cluster::ClusterConfig;
use polystat_grid::CellRadius;
use polystat_present::{SeverityThresholds, TextFitConfig};
use polystat_view2d::{DEFAULT_TRANSITION_TIMEOUT, ZoomProfile};
use polystat_virtual::VirtualizationConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default display cap; see [`DashboardConfig::max_items`].
pub const DEFAULT_MAX_ITEMS: usize = 5000;

/// Every tunable of a [`Dashboard`](crate::Dashboard).
///
/// Missing fields take their defaults when loading from JSON:
///
/// ```rust
/// use polystat_frame::DashboardConfig;
///
/// let config = DashboardConfig::from_json(r#"{
///     "max_items": 500,
///     "zoom": { "min_screen_radius": 8.0 }
/// }"#).unwrap();
/// assert_eq!(config.max_items, 500);
/// assert_eq!(config.zoom.min_screen_radius, 8.0);
/// assert_eq!(config.zoom.max_screen_fraction, 0.4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Items beyond this count collapse into a "+N others" cell.
    pub max_items: usize,
    /// Cell radius of both flat and grouped layouts. Overrides
    /// [`ClusterConfig::cell_radius`].
    pub cell_radius: CellRadius,
    /// Zoom limits and speeds.
    pub zoom: ZoomProfile,
    /// Grouped layout.
    pub cluster: ClusterConfig,
    /// Viewport culling.
    pub virtualization: VirtualizationConfig,
    /// Text fitting.
    pub text: TextFitConfig,
    /// Severity coloring.
    pub severity: SeverityThresholds,
    /// Safety timeout for recenter transitions, in milliseconds.
    pub transition_timeout_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            cell_radius: CellRadius::default(),
            zoom: ZoomProfile::default(),
            cluster: ClusterConfig::default(),
            virtualization: VirtualizationConfig::default(),
            text: TextFitConfig::default(),
            severity: SeverityThresholds::default(),
            transition_timeout_ms: u64::try_from(DEFAULT_TRANSITION_TIMEOUT.as_millis())
                .unwrap_or(300),
        }
    }
}

impl DashboardConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `json` is malformed or a field has the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value cannot be represented, such as a
    /// non-finite float.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// [`transition_timeout_ms`](Self::transition_timeout_ms) as a duration.
    #[must_use]
    pub fn transition_timeout(&self) -> Duration {
        Duration::from_millis(self.transition_timeout_ms)
    }

    /// Cluster configuration with the shared cell radius applied.
    #[must_use]
    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            cell_radius: self.cell_radius,
            ..self.cluster
        }
    }
}
