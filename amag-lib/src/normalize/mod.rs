//! Validation and normalization of tabular query results
//!
//! A query against a Log Analytics workspace returns one or more tables of loosely typed cells.
//! This module turns such a [`RawResult`] into an ordered sequence of [`NormalizedRecord`] values,
//! each holding a UTC timestamp taken from the `TimeGenerated` column and a 64-bit float taken
//! from the `MetricValue` column.
//!
//! # Implementation Model
//!
//! [`normalize`] is a pure function: it performs no I/O and no logging. A partial failure reported
//! by the query engine does not abort normalization; it is handed back to the caller in
//! [`Normalized::partial_error`] so that it can be reported as a warning.
//!
//! Any structural problem or any row whose cells cannot be coerced fails the whole result with a
//! [`NormalizeError`]. Rows are never skipped, reordered, or deduplicated.

mod cell;
mod normalize_error;
mod normalized_record;
mod normalizer;
mod raw_result;

pub use cell::Cell;
pub use normalize_error::{NormalizeError, SchemaError};
pub use normalized_record::NormalizedRecord;
pub use normalizer::{METRIC_VALUE_COLUMN, Normalized, TIME_GENERATED_COLUMN, TIMESTAMP_FORMAT, normalize};
pub use raw_result::{Column, RawResult, Table};
