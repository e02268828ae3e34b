//! Command-line interface and orchestration for amag
//!
//! This module implements the CLI commands and wires the Azure collaborators into the
//! pipelines. It handles argument parsing, configuration management, and the high-level workflows.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **metric**: Run a KQL query and publish the last `MetricValue` as a custom metric
//! - **log**: Run a KQL query and upload every row as a custom log record
//! - **init**: Generate a default configuration file
//! - **validate**: Check configuration file syntax and values
//! - **config set**: Change one value of the configuration file in place
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The metric and log commands follow the same pattern:
//!
//! 1. Load the configuration file
//! 2. Resolve every parameter from the command line, `AMAG_*` environment variables, or the
//!    configuration file, in that order
//! 3. Read the query file and pick a credential
//! 4. Hand a fully resolved job to a pipeline
//!
//! Configuration is a TOML file, `~/.amag/config.toml` unless `--config` says otherwise.

mod common;
mod config;
mod config_set;
mod host;
mod init;
mod logs;
mod metric;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use config_set::{ConfigArgs, process_config};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use logs::{LogArgs, process_log};
pub use metric::{MetricArgs, process_metric};
pub use run::run;
pub use validate::validate_config;
