//! Plumbing shared between the metric and log commands.

use super::config::Config;
use crate::Result;
use crate::clients::{ClientOptions, Credential, TimeWindow};
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use core::time::Duration;
use humantime_serde::re::humantime;
use ohno::{IntoAppError, app_err, bail};
use std::fs;

const LOG_TARGET: &str = "  commands";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A second `run` in the same process (tests) must not panic on an already installed logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Parse a human-friendly duration such as `24h` or `2days` on the command line.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| format!("invalid duration '{s}': {e}"))
}

/// Pick the first value among the command line or environment and the configuration file.
pub fn resolve(name: &str, from_args: Option<&str>, from_config: Option<&str>, hint: &str) -> Result<String> {
    from_args
        .or(from_config)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| app_err!("no {name} given: {hint}"))
}

/// Read the KQL query from `path`, refusing blank files.
pub fn read_query(path: &Utf8Path) -> Result<String> {
    let query = fs::read_to_string(path).into_app_err_with(|| format!("reading query file '{path}'"))?;
    if query.trim().is_empty() {
        bail!("query file '{path}' is empty");
    }

    log::debug!(target: LOG_TARGET, "Read {} bytes of KQL from '{path}'", query.len());
    Ok(query)
}

/// The query window ending at `now`.
pub fn query_window(timespan: Option<Duration>, config: &Config, now: DateTime<Utc>) -> TimeWindow {
    TimeWindow::ending_at(now, timespan.unwrap_or(config.query.timespan))
}

/// HTTP options and the credential every Azure client of one invocation shares.
pub fn azure_setup(config: &Config) -> Result<(ClientOptions, Credential)> {
    let options = ClientOptions::with_timeout(config.http.timeout);
    let credential = Credential::from_env(&options)?;
    Ok((options, credential))
}
