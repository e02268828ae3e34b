use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use core::fmt::{Display, Formatter};
use core::time::Duration;

/// The closed time range a workspace query is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The window of length `span` that ends at `end`.
    #[must_use]
    pub fn ending_at(end: DateTime<Utc>, span: Duration) -> Self {
        let span = TimeDelta::from_std(span).unwrap_or(TimeDelta::MAX);
        let start = end.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    /// ISO 8601 interval notation, `<start>/<end>`.
    #[must_use]
    pub fn to_iso_interval(&self) -> String {
        format!(
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_iso_interval())
    }
}
