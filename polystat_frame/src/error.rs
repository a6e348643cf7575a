// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error returned when a query response cannot be turned into items.
#[derive(Debug)]
pub enum IngestError {
    /// The body is not valid JSON or does not have the expected shape.
    Json(serde_json::Error),
    /// The server reported a failed query.
    Query {
        /// Prometheus `errorType`, when present.
        error_type: Option<String>,
        /// Error message from the body.
        message: String,
    },
    /// A sample value is not a decimal number.
    InvalidValue {
        /// Index of the offending series in the result.
        series: usize,
        /// The raw value string.
        value: String,
    },
    /// A successful response without a data section.
    MissingData,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed response: {err}"),
            Self::Query {
                error_type: Some(kind),
                message,
            } => write!(f, "query failed ({kind}): {message}"),
            Self::Query {
                error_type: None,
                message,
            } => write!(f, "query failed: {message}"),
            Self::InvalidValue { series, value } => {
                write!(f, "series {series} has a non-numeric value {value:?}")
            }
            Self::MissingData => f.write_str("response has no data"),
        }
    }
}

impl core::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Error returned when a [`DashboardConfig`](crate::DashboardConfig) cannot be
/// parsed.
#[derive(Debug)]
pub struct ConfigError(serde_json::Error);

impl ConfigError {
    /// Line of the offending input, 1-based.
    #[must_use]
    pub fn line(&self) -> usize {
        self.0.line()
    }

    /// Column of the offending input, 1-based.
    #[must_use]
    pub fn column(&self) -> usize {
        self.0.column()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid dashboard configuration: {}", self.0)
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self(err)
    }
}
