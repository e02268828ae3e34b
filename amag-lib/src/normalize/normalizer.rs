use super::{Cell, NormalizeError, NormalizedRecord, RawResult, SchemaError, Table};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Name of the column holding each row's event time.
pub const TIME_GENERATED_COLUMN: &str = "TimeGenerated";

/// Name of the column holding each row's numeric value.
pub const METRIC_VALUE_COLUMN: &str = "MetricValue";

/// The only accepted `TimeGenerated` layout, always interpreted as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// chrono accepts unpadded fields for `%m`, `%d` and friends, so the width is checked up front
static TIMESTAMP_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("invalid regex"));

/// The output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// One record per source row, in source row order.
    pub records: Vec<NormalizedRecord>,

    /// Partial-failure error reported by the query engine. The records above are still complete
    /// for the rows that were returned.
    pub partial_error: Option<String>,
}

/// Validate the shape of a query result and convert its rows into [`NormalizedRecord`]s.
///
/// The result must hold exactly one table containing `TimeGenerated` and `MetricValue` columns.
/// `TimeGenerated` cells must be strings of the form `YYYY-MM-DDTHH:MM:SSZ`; `MetricValue` cells
/// may be integers, floats, or numeric strings. The first offending row fails the whole result.
pub fn normalize(raw: RawResult) -> Result<Normalized, NormalizeError> {
    let RawResult { tables, partial_error } = raw;

    let table = match <[Table; 1]>::try_from(tables) {
        Ok([table]) => table,
        Err(tables) => return Err(SchemaError::TableCount(tables.len()).into()),
    };

    if table.columns.is_empty() {
        return Err(SchemaError::NoColumns.into());
    }

    let value_index = require_column(&table, METRIC_VALUE_COLUMN)?;
    let time_index = require_column(&table, TIME_GENERATED_COLUMN)?;

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let time_cell = cell_at(row, row_index, TIME_GENERATED_COLUMN, time_index)?;
            let value_cell = cell_at(row, row_index, METRIC_VALUE_COLUMN, value_index)?;

            Ok(NormalizedRecord::new(
                parse_timestamp(time_cell, row_index)?,
                coerce_value(value_cell, row_index)?,
            ))
        })
        .collect::<Result<Vec<_>, NormalizeError>>()?;

    Ok(Normalized { records, partial_error })
}

fn require_column(table: &Table, name: &'static str) -> Result<usize, NormalizeError> {
    table.position_of(name).ok_or_else(|| NormalizeError::ColumnNotFound {
        missing: name,
        available: table.column_names(),
    })
}

fn cell_at<'a>(row: &'a [Cell], row_index: usize, column: &'static str, position: usize) -> Result<&'a Cell, NormalizeError> {
    row.get(position).ok_or_else(|| {
        SchemaError::RowTooShort {
            row: row_index,
            found: row.len(),
            column,
            position,
        }
        .into()
    })
}

fn parse_timestamp(cell: &Cell, row: usize) -> Result<DateTime<Utc>, NormalizeError> {
    cell.as_str()
        .filter(|s| TIMESTAMP_SHAPE.is_match(s))
        .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| NormalizeError::TimestampParse { row, raw: cell.to_string() })
}

#[expect(clippy::cast_precision_loss, reason = "integers beyond 2^53 cannot be represented exactly as f64")]
fn coerce_value(cell: &Cell, row: usize) -> Result<f64, NormalizeError> {
    let value = match cell {
        Cell::Float(v) => *v,
        Cell::Float32(v) => f64::from(*v),
        Cell::Int(v) => *v as f64,
        Cell::Text(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| NormalizeError::InvalidNumericString { row, raw: s.clone() })?,
        Cell::Null | Cell::Bool(_) | Cell::Dynamic(_) => Err(NormalizeError::UnsupportedValueType {
            row,
            type_name: cell.type_name(),
            value: cell.to_string(),
        })?,
    };

    // JSON has no representation for NaN or infinities
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NormalizeError::NonFiniteValue {
            row,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn metric_table() -> Table {
        Table::new("PrimaryResult", ["TimeGenerated", "MetricValue"])
    }

    fn row(time: &str, value: impl Into<Cell>) -> Vec<Cell> {
        vec![Cell::from(time), value.into()]
    }

    #[test]
    fn test_record_count_and_order_match_rows() {
        let table = metric_table()
            .with_row(row("2024-05-01T03:00:00Z", 3.0))
            .with_row(row("2024-05-01T01:00:00Z", 1.0))
            .with_row(row("2024-05-01T02:00:00Z", 2.0));

        let normalized = normalize(RawResult::single(table)).unwrap();

        assert_eq!(
            normalized.records,
            vec![
                NormalizedRecord::new(ts(3), 3.0),
                NormalizedRecord::new(ts(1), 1.0),
                NormalizedRecord::new(ts(2), 2.0),
            ]
        );
        assert_eq!(normalized.partial_error, None);
    }

    #[test]
    fn test_duplicate_rows_are_kept() {
        let table = metric_table()
            .with_row(row("2024-05-01T01:00:00Z", 1.0))
            .with_row(row("2024-05-01T01:00:00Z", 1.0));

        let normalized = normalize(RawResult::single(table)).unwrap();
        assert_eq!(normalized.records.len(), 2);
    }

    #[test]
    fn test_empty_table_yields_no_records() {
        let normalized = normalize(RawResult::single(metric_table())).unwrap();
        assert!(normalized.records.is_empty());
    }

    #[test]
    fn test_columns_in_any_position() {
        let table = Table::new("PrimaryResult", ["Computer", "MetricValue", "Extra", "TimeGenerated"]).with_row(vec![
            Cell::from("vm-1"),
            Cell::Int(5),
            Cell::Null,
            Cell::from("2024-05-01T01:00:00Z"),
        ]);

        let normalized = normalize(RawResult::single(table)).unwrap();
        assert_eq!(normalized.records, vec![NormalizedRecord::new(ts(1), 5.0)]);
    }

    #[test]
    fn test_int_float_and_string_values_agree() {
        let table = metric_table()
            .with_row(row("2024-05-01T01:00:00Z", 3_i64))
            .with_row(row("2024-05-01T01:00:00Z", 3.0_f64))
            .with_row(row("2024-05-01T01:00:00Z", "3.0"))
            .with_row(row("2024-05-01T01:00:00Z", 3.0_f32));

        let normalized = normalize(RawResult::single(table)).unwrap();
        assert!(normalized.records.iter().all(|r| (r.value - 3.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_values_from_json_cells() {
        let table = metric_table()
            .with_row(vec![Cell::from(json!("2024-05-01T01:00:00Z")), Cell::from(json!(3))])
            .with_row(vec![Cell::from(json!("2024-05-01T01:00:00Z")), Cell::from(json!(2.5))]);

        let normalized = normalize(RawResult::single(table)).unwrap();
        assert!((normalized.records[0].value - 3.0).abs() < f64::EPSILON);
        assert!((normalized.records[1].value - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_tables_is_schema_error() {
        let err = normalize(RawResult::default()).unwrap_err();
        assert_eq!(err, NormalizeError::Schema(SchemaError::TableCount(0)));
    }

    #[test]
    fn test_two_tables_is_schema_error() {
        let err = normalize(RawResult::new(vec![metric_table(), metric_table()])).unwrap_err();
        assert_eq!(err, NormalizeError::Schema(SchemaError::TableCount(2)));
        insta::assert_snapshot!(err.to_string(), @"unexpected number of tables in the query result: expected 1, got 2");
    }

    #[test]
    fn test_no_columns_is_schema_error() {
        let err = normalize(RawResult::single(Table::default())).unwrap_err();
        assert_eq!(err, NormalizeError::Schema(SchemaError::NoColumns));
    }

    #[test]
    fn test_missing_metric_value_lists_present_columns() {
        let table = Table::new("PrimaryResult", ["TimeGenerated", "Value", "Computer"]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::ColumnNotFound {
                missing: "MetricValue",
                available: vec!["TimeGenerated".to_string(), "Value".to_string(), "Computer".to_string()],
            }
        );
        insta::assert_snapshot!(err.to_string(), @"'MetricValue' column not found in the query result; found columns: [TimeGenerated, Value, Computer]");
    }

    #[test]
    fn test_missing_time_generated() {
        let table = Table::new("PrimaryResult", ["timegenerated", "MetricValue"]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert!(matches!(err, NormalizeError::ColumnNotFound { missing: "TimeGenerated", .. }));
    }

    #[test]
    fn test_both_missing_reports_metric_value() {
        let table = Table::new("PrimaryResult", ["a"]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert!(matches!(err, NormalizeError::ColumnNotFound { missing: "MetricValue", .. }));
    }

    #[test]
    fn test_fractional_seconds_rejected() {
        let table = metric_table().with_row(row("2024-05-01T01:00:00.123Z", 1.0));
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::TimestampParse {
                row: 0,
                raw: "2024-05-01T01:00:00.123Z".to_string(),
            }
        );
    }

    #[test]
    fn test_unpadded_timestamp_rejected() {
        let table = metric_table().with_row(row("2024-5-1T1:0:0Z", 1_i64));
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::TimestampParse {
                row: 0,
                raw: "2024-5-1T1:0:0Z".to_string(),
            }
        );
    }

    #[test]
    fn test_offset_timestamp_rejected() {
        let table = metric_table()
            .with_row(row("2024-05-01T01:00:00Z", 1.0))
            .with_row(row("2024-05-01T01:00:00+02:00", 1.0));
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert!(matches!(err, NormalizeError::TimestampParse { row: 1, .. }));
    }

    #[test]
    fn test_non_string_timestamp_rejected() {
        let table = metric_table().with_row(vec![Cell::Int(1_714_525_200), Cell::Float(1.0)]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::TimestampParse {
                row: 0,
                raw: "1714525200".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_value_type() {
        let table = metric_table().with_row(vec![Cell::from("2024-05-01T01:00:00Z"), Cell::Bool(true)]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::UnsupportedValueType {
                row: 0,
                type_name: "bool",
                value: "true".to_string(),
            }
        );
        insta::assert_snapshot!(err.to_string(), @"unexpected MetricValue type bool in row 0, value: true");
    }

    #[test]
    fn test_null_value_fails_whole_result() {
        let table = metric_table()
            .with_row(row("2024-05-01T01:00:00Z", 1.0))
            .with_row(vec![Cell::from("2024-05-01T02:00:00Z"), Cell::Null]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert!(matches!(err, NormalizeError::UnsupportedValueType { row: 1, type_name: "null", .. }));
    }

    #[test]
    fn test_non_numeric_string_value() {
        let table = metric_table().with_row(row("2024-05-01T01:00:00Z", "lots"));
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::InvalidNumericString {
                row: 0,
                raw: "lots".to_string(),
            }
        );
    }

    #[test]
    fn test_non_finite_string_values_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let table = metric_table().with_row(row("2024-05-01T01:00:00Z", raw));
            let err = normalize(RawResult::single(table)).unwrap_err();

            assert_eq!(
                err,
                NormalizeError::InvalidNumericString {
                    row: 0,
                    raw: raw.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_non_finite_float_cells_rejected() {
        let table = metric_table()
            .with_row(row("2024-05-01T01:00:00Z", 1.0))
            .with_row(vec![Cell::from("2024-05-01T02:00:00Z"), Cell::Float(f64::NAN)])
            .with_row(vec![Cell::from("2024-05-01T03:00:00Z"), Cell::Float32(f32::INFINITY)]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert!(matches!(err, NormalizeError::NonFiniteValue { row: 1, .. }), "{err:?}");
    }

    #[test]
    fn test_short_row_is_schema_error() {
        let table = metric_table().with_row(vec![Cell::from("2024-05-01T01:00:00Z")]);
        let err = normalize(RawResult::single(table)).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::Schema(SchemaError::RowTooShort {
                row: 0,
                found: 1,
                column: "MetricValue",
                position: 1,
            })
        );
    }

    #[test]
    fn test_partial_error_is_surfaced_not_fatal() {
        let table = metric_table().with_row(row("2024-05-01T01:00:00Z", 1.0));
        let raw = RawResult::single(table).with_partial_error("PartialError: query exceeded memory limit");

        let normalized = normalize(raw).unwrap();

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(
            normalized.partial_error.as_deref(),
            Some("PartialError: query exceeded memory limit")
        );
    }
}
