use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// One record for the logs ingestion API.
///
/// `original_time_generated` is set only when the event time had to be replaced because it falls
/// outside the window the ingestion API accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogPayload {
    #[serde(serialize_with = "serialize_time")]
    pub time_generated: DateTime<Utc>,
    #[serde(serialize_with = "serialize_optional_time")]
    pub original_time_generated: Option<DateTime<Utc>>,
    pub name: String,
    pub value: f64,
}

impl LogPayload {
    #[must_use]
    pub fn build(metric_name: &str, value: f64, time_generated: DateTime<Utc>, original_time_generated: Option<DateTime<Utc>>) -> Self {
        Self {
            time_generated,
            original_time_generated,
            name: metric_name.to_string(),
            value,
        }
    }
}

fn serialize_time<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[expect(clippy::ref_option, reason = "signature imposed by serde's serialize_with")]
fn serialize_optional_time<S: Serializer>(time: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => serialize_time(t, serializer),
        None => serializer.serialize_none(),
    }
}
