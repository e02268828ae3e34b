use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace under which every custom metric is published.
pub const METRIC_NAMESPACE: &str = "CustomMetrics";

/// Body of a custom metrics submission carrying a single sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPayload {
    #[serde(serialize_with = "serialize_time", deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    pub data: MetricData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricData {
    pub base_data: BaseData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseData {
    pub metric: String,
    pub namespace: String,
    pub dim_names: Vec<String>,
    pub series: Vec<MetricSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub dim_values: Vec<String>,
    pub min: i64,
    pub max: i64,
    pub sum: i64,
    pub count: u64,
}

impl MetricPayload {
    /// Build a payload for `value`, stamped with the current time.
    #[must_use]
    pub fn build(metric_name: &str, value: f64) -> Self {
        Self::build_at(metric_name, value, Utc::now())
    }

    /// Build a payload for `value`, stamped with `time`.
    ///
    /// The custom metrics API only takes integer statistics: `value` is truncated toward zero and
    /// used as min, max and sum of a single-sample series. Values outside the `i64` range
    /// saturate and NaN becomes 0. Callers needing fractional precision must scale beforehand.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "truncation is what the wire format requires")]
    pub fn build_at(metric_name: &str, value: f64, time: DateTime<Utc>) -> Self {
        let truncated = value.trunc() as i64;

        Self {
            time,
            data: MetricData {
                base_data: BaseData {
                    metric: metric_name.to_string(),
                    namespace: METRIC_NAMESPACE.to_string(),
                    dim_names: vec![metric_name.to_string()],
                    series: vec![MetricSeries {
                        dim_values: vec![metric_name.to_string()],
                        min: truncated,
                        max: truncated,
                        sum: truncated,
                        count: 1,
                    }],
                },
            },
        }
    }

    #[must_use]
    pub fn metric_name(&self) -> &str {
        &self.data.base_data.metric
    }

    /// The single series of this payload.
    #[must_use]
    pub fn series(&self) -> Option<&MetricSeries> {
        self.data.base_data.series.first()
    }
}

fn serialize_time<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn deserialize_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}
