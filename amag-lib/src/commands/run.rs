//! Command dispatch logic for amag

use super::common::{LogLevel, init_logging};
use super::config::Config;
use super::{
    ConfigArgs, InitArgs, LogArgs, MetricArgs, init_config, process_config, process_log, process_metric, validate_config,
};
use crate::{Host, Result};
use camino::Utf8PathBuf;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "amag", version, author)]
#[command(about = "Republish the result of a KQL query as an Azure Monitor custom metric or custom log")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Path to configuration file (default is `~/.amag/config.toml`)
    #[arg(long, short = 'c', value_name = "PATH", env = "AMAG_CONFIG", global = true)]
    config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: AmagSubcommand,
}

#[derive(Subcommand, Debug)]
enum AmagSubcommand {
    /// Run a KQL query and save its last MetricValue as a custom metric
    Metric(Box<MetricArgs>),
    /// Run a KQL query and save every row as a custom log record
    Log(Box<LogArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate,
    /// Edit the configuration file
    Config(ConfigArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails. The error is
/// also written to the host's error stream and the host is asked to exit with status 1.
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    let config_path = cli.config.as_deref();
    let result = match &cli.command {
        AmagSubcommand::Metric(metric_args) => {
            async {
                let config = Config::load(config_path)?;
                process_metric(host, metric_args, &config).await
            }
            .await
        }
        AmagSubcommand::Log(log_args) => {
            async {
                let config = Config::load(config_path)?;
                process_log(host, log_args, &config).await
            }
            .await
        }
        AmagSubcommand::Init(init_args) => init_config(host, init_args, config_path),
        AmagSubcommand::Validate => validate_config(host, config_path),
        AmagSubcommand::Config(config_args) => process_config(host, config_args, config_path),
    };

    if let Err(e) = &result {
        let _ = writeln!(host.error(), "❌ {e:#}");
        host.exit(1);
    }

    result
}
