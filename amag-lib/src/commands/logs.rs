use super::Host;
use super::common::{azure_setup, parse_duration, query_window, read_query, resolve};
use super::config::Config;
use crate::Result;
use crate::clients::{LogsIngestionClient, WorkspaceClient};
use crate::pipeline::{LogJob, LogPipeline};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use core::time::Duration;
use ohno::IntoAppError;
use std::io::Write;
use url::Url;

#[derive(Parser, Debug)]
pub struct LogArgs {
    /// Path to the KQL file to run
    #[arg(long, short = 'f', value_name = "PATH", env = "AMAG_FILE")]
    pub file: Utf8PathBuf,

    /// Name written to the Name column of every uploaded record
    #[arg(long, short = 'm', value_name = "NAME", env = "AMAG_METRIC")]
    pub metric: String,

    /// Workspace id (not the resource id) of the Log Analytics workspace to query
    #[arg(long, short = 'w', value_name = "ID", env = "AMAG_WORKSPACE_ID")]
    pub workspace_id: Option<String>,

    /// Logs ingestion endpoint of the data collection endpoint to send data to
    #[arg(long, short = 'e', value_name = "URL", env = "AMAG_DATA_COLLECTION_ENDPOINT")]
    pub data_collection_endpoint: Option<String>,

    /// Immutable id of the data collection rule to use
    #[arg(long, short = 'r', value_name = "ID", env = "AMAG_DATA_COLLECTION_RULE_ID")]
    pub data_collection_rule_id: Option<String>,

    /// Stream of the data collection rule to send data to
    #[arg(long, short = 's', value_name = "NAME", env = "AMAG_STREAM_NAME")]
    pub stream_name: Option<String>,

    /// How far back from now the query looks, e.g. `24h`
    #[arg(long, value_name = "DURATION", env = "AMAG_TIMESPAN", value_parser = parse_duration)]
    pub timespan: Option<Duration>,
}

/// Run a query and upload every row as a custom log record
pub async fn process_log<H: Host>(host: &mut H, args: &LogArgs, config: &Config) -> Result<()> {
    let file = resolve("query file", Some(args.file.as_str()), None, "pass --file or set AMAG_FILE")?;
    let metric_name = resolve("metric name", Some(&args.metric), None, "pass --metric or set AMAG_METRIC")?;

    let workspace_id = resolve(
        "workspace id",
        args.workspace_id.as_deref(),
        config.query.workspace_id.as_deref(),
        "pass --workspace-id, set AMAG_WORKSPACE_ID, or set query.workspace_id in the configuration file",
    )?;

    let endpoint = resolve(
        "data collection endpoint",
        args.data_collection_endpoint.as_deref(),
        config.log.data_collection_endpoint.as_deref(),
        "pass --data-collection-endpoint, set AMAG_DATA_COLLECTION_ENDPOINT, or set log.data_collection_endpoint in the configuration file",
    )?;
    let _ = Url::parse(&endpoint).into_app_err_with(|| format!("invalid data collection endpoint '{endpoint}'"))?;

    let rule_id = resolve(
        "data collection rule id",
        args.data_collection_rule_id.as_deref(),
        config.log.data_collection_rule_id.as_deref(),
        "pass --data-collection-rule-id, set AMAG_DATA_COLLECTION_RULE_ID, or set log.data_collection_rule_id in the configuration file",
    )?;

    let stream_name = resolve(
        "stream name",
        args.stream_name.as_deref(),
        config.log.stream_name.as_deref(),
        "pass --stream-name, set AMAG_STREAM_NAME, or set log.stream_name in the configuration file",
    )?;

    let query = read_query(Utf8Path::new(&file))?;

    let now = Utc::now();
    let job = LogJob {
        query,
        window: query_window(args.timespan, config, now),
        metric_name,
        rule_id,
        stream_name,
        ingestion_window: config.log.ingestion_window,
    };

    let (options, credential) = azure_setup(config)?;
    let executor = WorkspaceClient::new(workspace_id, &credential, &options)?.with_endpoint(&config.query.endpoint);
    let sink = LogsIngestionClient::new(endpoint, &credential, &options)?;

    let report = LogPipeline::new(executor, sink).run(&job, now).await?;

    if report.payloads.is_empty() {
        let _ = writeln!(host.output(), "The query returned no rows; no log records were uploaded");
    } else {
        let _ = writeln!(
            host.output(),
            "Saved {} log record(s) for '{}' to stream '{}' ({} stamped with the current time)",
            report.payloads.len(),
            job.metric_name,
            job.stream_name,
            report.backdated
        );
    }

    Ok(())
}
