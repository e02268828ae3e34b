use chrono::{DateTime, Utc};

/// One row of a query result reduced to its event time and metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRecord {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl NormalizedRecord {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}
