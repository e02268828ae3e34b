use super::{LOG_TARGET, warn_on_partial_error};
use crate::Result;
use crate::clients::{LogsSink, QueryExecutor, TimeWindow};
use crate::normalize::{NormalizedRecord, normalize};
use crate::payloads::LogPayload;
use chrono::{DateTime, TimeDelta, Utc};
use core::time::Duration;
use ohno::IntoAppError;

/// Everything needed to turn one query into a batch of log records.
#[derive(Debug, Clone)]
pub struct LogJob {
    pub query: String,
    pub window: TimeWindow,
    pub metric_name: String,
    pub rule_id: String,
    pub stream_name: String,

    /// How far back a record's event time may lie and still be accepted as `TimeGenerated`.
    pub ingestion_window: Duration,
}

/// What a successful log run uploaded.
#[derive(Debug, Clone, Default)]
pub struct LogReport {
    pub payloads: Vec<LogPayload>,

    /// Number of records whose event time was moved to `OriginalTimeGenerated`.
    pub backdated: usize,
}

#[derive(Debug)]
pub struct LogPipeline<Q, S> {
    executor: Q,
    sink: S,
}

impl<Q: QueryExecutor, S: LogsSink> LogPipeline<Q, S> {
    pub const fn new(executor: Q, sink: S) -> Self {
        Self { executor, sink }
    }

    /// Run the query and upload one log record per row.
    ///
    /// An empty result uploads nothing and succeeds.
    pub async fn run(&self, job: &LogJob, now: DateTime<Utc>) -> Result<LogReport> {
        log::debug!(target: LOG_TARGET, "Running query:\n{}", job.query);

        let raw = self.executor.run(&job.query, job.window).await?;
        let normalized = normalize(raw)?;
        warn_on_partial_error(normalized.partial_error.as_deref());

        if normalized.records.is_empty() {
            log::info!(target: LOG_TARGET, "The query returned no rows, nothing to upload");
            return Ok(LogReport::default());
        }

        let payloads: Vec<_> = normalized
            .records
            .iter()
            .map(|record| to_log_payload(&job.metric_name, record, now, job.ingestion_window))
            .collect();

        let backdated = payloads.iter().filter(|p| p.original_time_generated.is_some()).count();
        if backdated > 0 {
            log::debug!(
                target: LOG_TARGET,
                "{backdated} record(s) are older than the ingestion window and are stamped with the current time"
            );
        }

        let body = serde_json::to_vec(&payloads).into_app_err("unable to serialize log records")?;

        log::info!(
            target: LOG_TARGET,
            "Uploading {} log record(s) for '{}' to stream '{}'",
            payloads.len(),
            job.metric_name,
            job.stream_name
        );
        self.sink.upload(&job.rule_id, &job.stream_name, body).await?;

        Ok(LogReport { payloads, backdated })
    }
}

/// Records older than `ingestion_window` are rejected by the ingestion API, so they are sent with
/// `now` as `TimeGenerated` and keep their event time in `OriginalTimeGenerated`.
fn to_log_payload(metric_name: &str, record: &NormalizedRecord, now: DateTime<Utc>, ingestion_window: Duration) -> LogPayload {
    let window = TimeDelta::from_std(ingestion_window).unwrap_or(TimeDelta::MAX);

    if now.signed_duration_since(record.timestamp) <= window {
        LogPayload::build(metric_name, record.value, record.timestamp, None)
    } else {
        LogPayload::build(metric_name, record.value, now, Some(record.timestamp))
    }
}
