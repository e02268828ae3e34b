//! Outbound payloads for Azure Monitor
//!
//! Two payload shapes are produced from a single normalized value:
//!
//! - [`MetricPayload`]: the custom metrics API body. The API accepts one aggregate
//!   (min/max/sum/count) per series, with integer statistics, so the value is truncated toward zero.
//! - [`LogPayload`]: one record for the logs ingestion API. The value keeps full `f64` precision,
//!   and a second timestamp preserves the event time of records older than the ingestion window.
//!
//! Both builders are stateless and produce exactly one payload per call.

mod log_payload;
mod metric_payload;

pub use log_payload::LogPayload;
pub use metric_payload::{BaseData, METRIC_NAMESPACE, MetricData, MetricPayload, MetricSeries};
