//! End-to-end flows
//!
//! A pipeline owns one [`QueryExecutor`](crate::clients::QueryExecutor) and one sink, and runs a
//! fully resolved job: query, normalize, build payloads, send. Pipelines do not read configuration
//! or the environment; everything they need is in the job.

mod log_pipeline;
mod metric_pipeline;

pub use log_pipeline::{LogJob, LogPipeline, LogReport};
pub use metric_pipeline::{MetricJob, MetricPipeline, MetricReport};

const LOG_TARGET: &str = "  pipeline";

fn warn_on_partial_error(partial_error: Option<&str>) {
    if let Some(error) = partial_error {
        log::warn!(target: LOG_TARGET, "The query returned a partial result: {error}");
    }
}
