use super::Host;
use super::common::{azure_setup, parse_duration, query_window, read_query, resolve};
use super::config::{Config, require_region};
use crate::Result;
use crate::clients::{CustomMetricsClient, WorkspaceClient};
use crate::pipeline::{MetricJob, MetricPipeline};
use crate::scope::ScopeId;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Parser;
use core::time::Duration;
use ohno::app_err;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct MetricArgs {
    /// Path to the KQL file to run
    #[arg(long, short = 'f', value_name = "PATH", env = "AMAG_FILE")]
    pub file: Utf8PathBuf,

    /// Name of the custom metric to save the result into
    #[arg(long, short = 'm', value_name = "NAME", env = "AMAG_METRIC")]
    pub metric: String,

    /// Workspace id (not the resource id) of the Log Analytics workspace to query
    #[arg(long, short = 'w', value_name = "ID", env = "AMAG_WORKSPACE_ID")]
    pub workspace_id: Option<String>,

    /// Resource id of the scope to save the custom metric to
    #[arg(long, short = 's', value_name = "SCOPE", env = "AMAG_SCOPE_RESOURCE_ID")]
    pub scope_resource_id: Option<String>,

    /// Azure region of the scope resource
    #[arg(long, value_name = "REGION", env = "AMAG_REGION")]
    pub region: Option<String>,

    /// How far back from now the query looks, e.g. `24h`
    #[arg(long, value_name = "DURATION", env = "AMAG_TIMESPAN", value_parser = parse_duration)]
    pub timespan: Option<Duration>,
}

/// Run a query and publish its last `MetricValue` as an Azure Monitor custom metric
pub async fn process_metric<H: Host>(host: &mut H, args: &MetricArgs, config: &Config) -> Result<()> {
    let file = resolve("query file", Some(args.file.as_str()), None, "pass --file or set AMAG_FILE")?;
    let metric_name = resolve("metric name", Some(&args.metric), None, "pass --metric or set AMAG_METRIC")?;

    let workspace_id = resolve(
        "workspace id",
        args.workspace_id.as_deref(),
        config.query.workspace_id.as_deref(),
        "pass --workspace-id, set AMAG_WORKSPACE_ID, or set query.workspace_id in the configuration file",
    )?;

    let scope = resolve(
        "scope resource id",
        args.scope_resource_id.as_deref(),
        config.metric.scope_resource_id.as_deref(),
        "pass --scope-resource-id, set AMAG_SCOPE_RESOURCE_ID, or set metric.scope_resource_id in the configuration file",
    )?;
    let scope = ScopeId::parse(&scope).map_err(|e| app_err!("{e}; metrics only support a resource or subresource scope"))?;

    let region = args.region.clone().unwrap_or_else(|| config.metric.region.clone());
    require_region("--region", &region)?;
    let query = read_query(Utf8Path::new(&file))?;

    let now = Utc::now();
    let job = MetricJob {
        query,
        window: query_window(args.timespan, config, now),
        metric_name,
        scope,
        region,
    };

    let (options, credential) = azure_setup(config)?;
    let executor = WorkspaceClient::new(workspace_id, &credential, &options)?.with_endpoint(&config.query.endpoint);
    let sink = CustomMetricsClient::new(&credential, &options)?;

    let report = MetricPipeline::new(executor, sink).run(&job, now).await?;

    let sent = report.payload.series().map_or(0, |s| s.sum);
    let _ = writeln!(
        host.output(),
        "Saved custom metric '{}' = {sent} (query value {} at {}, {} row(s)) to {}",
        job.metric_name,
        report.source.value,
        report.source.timestamp,
        report.record_count,
        job.scope
    );

    Ok(())
}
