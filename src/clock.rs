// Wall-clock zone: how epoch timestamps become local hours and dates.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

/// The zone used for the time-of-day risk factor and for display.
///
/// `System` resolves the offset per timestamp, so a January sample read in
/// an October process still gets January's offset. `Fixed` ignores DST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    #[default]
    System,
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Wall-clock time for an epoch-millisecond timestamp, or None if it is
    /// out of chrono's range.
    pub fn local_time(&self, timestamp_ms: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp_millis(timestamp_ms)?;
        Some(match self {
            LocalZone::System => utc.with_timezone(&Local).naive_local(),
            LocalZone::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        })
    }
}
