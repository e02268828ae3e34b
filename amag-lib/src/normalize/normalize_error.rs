use thiserror::Error;

/// The result does not have the shape of a single-table metric query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unexpected number of tables in the query result: expected 1, got {0}")]
    TableCount(usize),

    #[error("no columns found in the query result")]
    NoColumns,

    #[error("row {row} has {found} cells but column '{column}' is at position {position}")]
    RowTooShort {
        row: usize,
        found: usize,
        column: &'static str,
        position: usize,
    },
}

/// Reasons a [`RawResult`](super::RawResult) cannot be normalized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("'{missing}' column not found in the query result; found columns: [{}]", .available.join(", "))]
    ColumnNotFound { missing: &'static str, available: Vec<String> },

    #[error("unable to parse TimeGenerated value '{raw}' in row {row} as a timestamp: expected the form YYYY-MM-DDTHH:MM:SSZ")]
    TimestampParse { row: usize, raw: String },

    #[error("unexpected MetricValue type {type_name} in row {row}, value: {value}")]
    UnsupportedValueType {
        row: usize,
        type_name: &'static str,
        value: String,
    },

    #[error("unable to parse MetricValue '{raw}' in row {row} as a float")]
    InvalidNumericString { row: usize, raw: String },

    #[error("MetricValue {value} in row {row} is not a finite number")]
    NonFiniteValue { row: usize, value: String },
}
