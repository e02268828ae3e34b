#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for amag
//!
//! This library consolidates all functionality for the amag tool, which runs a KQL query against a
//! Log Analytics workspace and republishes the `MetricValue` column of the result as an Azure Monitor
//! custom metric or as a custom log record.
//!
//! # Module Organization
//!
//! - [`normalize`]: Validation and normalization of tabular query results
//! - [`payloads`]: Custom metric and log record payload construction
//! - [`scope`]: Resource scope identifier validation
//! - [`clients`]: Query, ingestion, and credential collaborators
//! - [`pipeline`]: End-to-end query → normalize → build → send flows
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod clients;
pub mod normalize;
pub mod payloads;
pub mod pipeline;
pub mod scope;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub use crate::commands::{Host, run};
