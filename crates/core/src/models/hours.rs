use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::hhmm;

/// Opening hours of a location for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHours {
    /// 0 = Sunday through 6 = Saturday
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
    #[serde(default)]
    pub is_closed: bool,
}

impl LocationHours {
    /// True when this record governs `date` and the location is open that day.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        !self.is_closed && u32::from(self.day_of_week) == weekday_index(date)
    }
}

/// A staff member's working interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInterval {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub employee_id: Uuid,
}

/// An already committed appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInterval {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub employee_id: Option<Uuid>,
}

impl BookingInterval {
    /// Half-open overlap with `[start, end)`. Touching boundaries do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end_time && end > self.start_time
    }
}

/// Weekday of `date` counted from Sunday, matching [`LocationHours::day_of_week`].
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
