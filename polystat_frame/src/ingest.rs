// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning query responses into [`MetricItem`]s.
//!
//! Two shapes are understood:
//!
//! - A Prometheus instant-query body (`/api/v1/query`), where each series of
//!   the result vector carries its labels in `metric` and its sample in
//!   `value = [timestamp, "value"]`.
//! - The Polystat backend envelope, `{status, data: [{name, value, labels,
//!   timestamp}]}`, which is the same data already flattened.
//!
//! ```rust
//! use polystat_frame::parse_instant_query;
//!
//! let body = r#"{
//!     "status": "success",
//!     "data": {
//!         "resultType": "vector",
//!         "result": [
//!             {"metric": {"__name__": "up", "job": "node"}, "value": [1700000000.5, "1"]},
//!             {"metric": {"job": "api"}, "value": [1700000000.5, "0"]}
//!         ]
//!     }
//! }"#;
//! let items = parse_instant_query(body).unwrap();
//! assert_eq!(items[0].name, "up");
//! assert_eq!(items[0].label("job"), Some("node"));
//! assert_eq!(items[1].name, "custom_metric");
//! ```

use std::collections::BTreeMap;

use polystat_grid::MetricItem;
use serde::Deserialize;

use crate::error::IngestError;

/// Label holding the metric name in Prometheus results.
pub const NAME_LABEL: &str = "__name__";

/// Name given to series without a [`NAME_LABEL`], e.g. results of
/// aggregations.
pub const UNNAMED_METRIC: &str = "custom_metric";

const STATUS_ERROR: &str = "error";

#[derive(Deserialize)]
struct QueryEnvelope {
    status: Option<String>,
    data: Option<QueryData>,
    #[serde(rename = "errorType")]
    error_type: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<Series>,
}

#[derive(Deserialize)]
struct Series {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: Option<(f64, String)>,
}

#[derive(Deserialize)]
struct BackendEnvelope {
    status: String,
    data: Option<Vec<BackendPoint>>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct BackendPoint {
    name: String,
    value: f64,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    timestamp: Option<Timestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Seconds(f64),
    Text(String),
}

impl Timestamp {
    /// Unix seconds; textual timestamps that are not plain numbers map to 0.
    fn seconds(&self) -> f64 {
        match self {
            Self::Seconds(s) => *s,
            Self::Text(t) => t.trim().parse().unwrap_or(0.0),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MetricNames {
    Envelope {
        status: String,
        data: Option<Vec<String>>,
        error: Option<String>,
    },
    List(Vec<String>),
}

fn query_error(error_type: Option<String>, error: Option<String>) -> IngestError {
    IngestError::Query {
        error_type,
        message: error.unwrap_or_else(|| "unknown error".to_owned()),
    }
}

/// Parses a Prometheus instant-query response.
///
/// Series without a sample value (for example range-vector results) are
/// skipped. `__name__` becomes the item name ([`UNNAMED_METRIC`] when
/// absent); all other labels are kept.
///
/// # Errors
///
/// - [`IngestError::Query`] for a `"status": "error"` body.
/// - [`IngestError::MissingData`] when there is no `data` section.
/// - [`IngestError::InvalidValue`] when a sample is not a number.
/// - [`IngestError::Json`] for malformed JSON.
pub fn parse_instant_query(body: &str) -> Result<Vec<MetricItem>, IngestError> {
    let envelope: QueryEnvelope = serde_json::from_str(body)?;
    if envelope.status.as_deref() == Some(STATUS_ERROR) {
        return Err(query_error(envelope.error_type, envelope.error));
    }
    let data = envelope.data.ok_or(IngestError::MissingData)?;

    let mut items = Vec::with_capacity(data.result.len());
    for (index, series) in data.result.into_iter().enumerate() {
        let Some((timestamp, raw)) = series.value else {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, "skipping series without an instant value");
            continue;
        };
        let value: f64 = raw.trim().parse().map_err(|_| IngestError::InvalidValue {
            series: index,
            value: raw,
        })?;
        let mut labels = series.metric;
        let name = labels
            .remove(NAME_LABEL)
            .unwrap_or_else(|| UNNAMED_METRIC.to_owned());
        let mut item = MetricItem::new(name, value).with_timestamp(timestamp);
        item.labels = labels;
        items.push(item);
    }
    Ok(items)
}

/// Parses the backend's `{status, data: [{name, value, labels, timestamp}]}`
/// envelope.
///
/// # Errors
///
/// [`IngestError::Query`] when `status` is `"error"`,
/// [`IngestError::MissingData`] when a successful body has no `data`, and
/// [`IngestError::Json`] for malformed JSON.
pub fn parse_backend_response(body: &str) -> Result<Vec<MetricItem>, IngestError> {
    let envelope: BackendEnvelope = serde_json::from_str(body)?;
    if envelope.status == STATUS_ERROR {
        return Err(query_error(None, envelope.error));
    }
    let points = envelope.data.ok_or(IngestError::MissingData)?;
    Ok(points
        .into_iter()
        .map(|point| {
            let mut item = MetricItem::new(point.name, point.value)
                .with_timestamp(point.timestamp.as_ref().map_or(0.0, Timestamp::seconds));
            item.labels = point.labels;
            item
        })
        .collect())
}

/// Parses the list of available metric names
/// (`/api/v1/label/__name__/values`), either enveloped or as a bare array.
///
/// # Errors
///
/// [`IngestError::Query`] when `status` is `"error"`,
/// [`IngestError::MissingData`] when a successful body has no `data`, and
/// [`IngestError::Json`] for anything else.
pub fn parse_metric_names(body: &str) -> Result<Vec<String>, IngestError> {
    match serde_json::from_str(body)? {
        MetricNames::List(names) => Ok(names),
        MetricNames::Envelope { status, error, .. } if status == STATUS_ERROR => {
            Err(query_error(None, error))
        }
        MetricNames::Envelope { data, .. } => data.ok_or(IngestError::MissingData),
    }
}

#[cfg(test)]
mod tests {
    use polystat_grid::MetricItem;

    use super::{UNNAMED_METRIC, parse_backend_response, parse_instant_query, parse_metric_names};
    use crate::IngestError;

    #[test]
    fn instant_query_keeps_labels_and_timestamp() {
        let body = r#"{"status":"success","data":{"resultType":"vector","result":[
            {"metric":{"__name__":"node_load1","instance":"a:9100","job":"node"},"value":[1700000000.25,"0.75"]}
        ]}}"#;
        let items = parse_instant_query(body).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.name, "node_load1");
        assert_eq!(item.value, 0.75);
        assert_eq!(item.timestamp, 1_700_000_000.25);
        assert_eq!(item.label("instance"), Some("a:9100"));
        assert_eq!(item.label("__name__"), None);
        assert_eq!(item.labels.len(), 2);
    }

    #[test]
    fn unnamed_series_and_special_values() {
        let body = r#"{"status":"success","data":{"result":[
            {"metric":{},"value":[1,"NaN"]},
            {"metric":{"job":"x"},"value":[1,"+Inf"]},
            {"metric":{"job":"y"},"values":[[1,"2"]]}
        ]}}"#;
        let items = parse_instant_query(body).unwrap();
        assert_eq!(items.len(), 2, "matrix series are skipped");
        assert_eq!(items[0].name, UNNAMED_METRIC);
        assert!(items[0].value.is_nan());
        assert_eq!(items[1].value, f64::INFINITY);
    }

    #[test]
    fn direct_responses_without_status_are_accepted() {
        let body = r#"{"data":{"result":[{"metric":{"__name__":"up"},"value":[5,"1"]}]}}"#;
        let items = parse_instant_query(body).unwrap();
        assert_eq!(items[0].name, "up");
    }

    #[test]
    fn error_status_surfaces() {
        let body = r#"{"status":"error","errorType":"bad_data","error":"parse error at char 4"}"#;
        match parse_instant_query(body) {
            Err(IngestError::Query {
                error_type,
                message,
            }) => {
                assert_eq!(error_type.as_deref(), Some("bad_data"));
                assert_eq!(message, "parse error at char 4");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let err = parse_instant_query(body).unwrap_err();
        assert_eq!(err.to_string(), "query failed (bad_data): parse error at char 4");
    }

    #[test]
    fn bad_inputs_are_errors() {
        assert!(matches!(parse_instant_query("{"), Err(IngestError::Json(_))));
        assert!(matches!(
            parse_instant_query(r#"{"status":"success"}"#),
            Err(IngestError::MissingData)
        ));
        assert!(matches!(
            parse_instant_query(
                r#"{"status":"success","data":{"result":[{"metric":{},"value":[1,"abc"]}]}}"#
            ),
            Err(IngestError::InvalidValue { series: 0, .. })
        ));
    }

    #[test]
    fn backend_envelope() {
        let body = r#"{"status":"success","data":[
            {"name":"up","value":1.0,"labels":{"job":"node"},"timestamp":1700000000},
            {"name":"mem","value":42.5,"timestamp":"2024-01-01T00:00:00Z"}
        ]}"#;
        let items: Vec<MetricItem> = parse_backend_response(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].timestamp, 1_700_000_000.0);
        assert_eq!(items[0].label("job"), Some("node"));
        assert_eq!(items[1].timestamp, 0.0);
        assert!(items[1].labels.is_empty());

        let failed = parse_backend_response(r#"{"status":"error","error":"timeout"}"#);
        assert!(matches!(failed, Err(IngestError::Query { .. })));
    }

    #[test]
    fn metric_names_in_both_shapes() {
        assert_eq!(
            parse_metric_names(r#"{"status":"success","data":["up","node_load1"]}"#).unwrap(),
            ["up", "node_load1"]
        );
        assert_eq!(parse_metric_names(r#"["a"]"#).unwrap(), ["a"]);
        assert!(matches!(
            parse_metric_names(r#"{"status":"error","error":"nope"}"#),
            Err(IngestError::Query { .. })
        ));
    }
}
