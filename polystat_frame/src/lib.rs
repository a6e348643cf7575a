// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polystat Frame: the honeycomb dashboard engine.
//!
//! This crate ties the layout crates together behind one stateful
//! [`Dashboard`]:
//!
//! - Ingestion of Prometheus instant-query responses ([`parse_instant_query`],
//!   [`parse_backend_response`], [`parse_metric_names`]) into
//!   [`MetricItem`](polystat_grid::MetricItem)s.
//! - A display cap that folds the least significant items into one
//!   "+N others" cell ([`cap_items`]).
//! - Grouping by label with drill-down filters, flat honeycomb layout, zoom
//!   and pan, and culling of off-screen cells.
//! - Per-frame presentation: every visible cell becomes a [`DrawRecord`]
//!   with color, fitted text and tooltip; group headers are included only
//!   once a regrouping has settled ([`HeaderGate`]).
//! - A JSON-loadable [`DashboardConfig`] holding every tunable.
//!
//! The host owns the clock, the event loop and the renderer.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//!
//! use kurbo::Size;
//! use polystat_frame::{Dashboard, DashboardConfig, parse_instant_query};
//! use polystat_present::MonospaceMeasurer;
//!
//! let body = r#"{
//!   "status": "success",
//!   "data": { "resultType": "vector", "result": [
//!     { "metric": { "__name__": "up", "env": "prod" }, "value": [1700000000, "1"] },
//!     { "metric": { "__name__": "up", "env": "dev" }, "value": [1700000000, "0"] }
//!   ] }
//! }"#;
//!
//! let mut dashboard = Dashboard::new(
//!     Size::new(800.0, 600.0),
//!     DashboardConfig::default(),
//!     MonospaceMeasurer::default(),
//! );
//! dashboard.set_items(parse_instant_query(body).unwrap(), Duration::ZERO);
//!
//! let frame = dashboard.frame(Duration::ZERO);
//! assert_eq!(frame.draws.len(), 2);
//! assert!(frame.headers.is_none());
//!
//! dashboard.set_group_by(Some("env".into()), Duration::ZERO);
//! let frame = dashboard.frame(Duration::ZERO);
//! assert!(frame.is_transitioning);
//! dashboard.layout_settled(frame.generation);
//! let frame = dashboard.frame(Duration::from_millis(16));
//! assert_eq!(frame.headers.map(|h| h.len()), Some(2));
//! ```

mod cap;
mod config;
mod dashboard;
mod error;
mod frame;
mod ingest;

pub use cap::cap_items;
pub use config::{DEFAULT_MAX_ITEMS, DashboardConfig};
pub use dashboard::Dashboard;
pub use error::{ConfigError, IngestError};
pub use frame::{DrawRecord, Frame, HeaderGate};
pub use ingest::{
    NAME_LABEL, UNNAMED_METRIC, parse_backend_response, parse_instant_query, parse_metric_names,
};
