use super::{LOG_TARGET, warn_on_partial_error};
use crate::Result;
use crate::clients::{MetricsSink, QueryExecutor, TimeWindow};
use crate::normalize::{NormalizedRecord, normalize};
use crate::payloads::MetricPayload;
use crate::scope::ScopeId;
use chrono::{DateTime, Utc};
use ohno::bail;

/// Everything needed to turn one query into one custom metric.
#[derive(Debug, Clone)]
pub struct MetricJob {
    pub query: String,
    pub window: TimeWindow,
    pub metric_name: String,
    pub scope: ScopeId,
    pub region: String,
}

/// What a successful metric run submitted.
#[derive(Debug, Clone)]
pub struct MetricReport {
    pub payload: MetricPayload,
    pub source: NormalizedRecord,
    pub record_count: usize,
}

#[derive(Debug)]
pub struct MetricPipeline<Q, S> {
    executor: Q,
    sink: S,
}

impl<Q: QueryExecutor, S: MetricsSink> MetricPipeline<Q, S> {
    pub const fn new(executor: Q, sink: S) -> Self {
        Self { executor, sink }
    }

    /// Run the query and publish its last record, stamped with `now`.
    ///
    /// # Errors
    ///
    /// Fails if the query, normalization, or submission fails, or if the query returned no rows.
    pub async fn run(&self, job: &MetricJob, now: DateTime<Utc>) -> Result<MetricReport> {
        log::debug!(target: LOG_TARGET, "Running query:\n{}", job.query);

        let raw = self.executor.run(&job.query, job.window).await?;
        let normalized = normalize(raw)?;
        warn_on_partial_error(normalized.partial_error.as_deref());

        let record_count = normalized.records.len();
        let Some(&source) = normalized.records.last() else {
            bail!("the query returned no rows between {} and {}; there is no value to send", job.window.start, job.window.end);
        };

        if record_count > 1 {
            log::debug!(target: LOG_TARGET, "The query returned {record_count} rows, using the last one");
        }

        let payload = MetricPayload::build_at(&job.metric_name, source.value, now);

        log::info!(target: LOG_TARGET, "Sending custom metric '{}' with value {} to {}", job.metric_name, source.value, job.scope);
        self.sink.send(&job.scope, &job.region, &payload).await?;

        Ok(MetricReport {
            payload,
            source,
            record_count,
        })
    }
}
