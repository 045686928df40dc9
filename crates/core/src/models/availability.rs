use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::TimeSlot;

/// Staff picked for a cart item. `Any` leaves the choice to the salon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffChoice {
    Any,
    Staff(Uuid),
}

impl FromStr for StaffChoice {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "any" => Ok(StaffChoice::Any),
            id => Uuid::parse_str(id).map(StaffChoice::Staff),
        }
    }
}

impl fmt::Display for StaffChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffChoice::Any => write!(f, "any"),
            StaffChoice::Staff(id) => write!(f, "{}", id),
        }
    }
}

/// Everything needed to produce the slot list for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub location_id: Uuid,
    pub date: NaiveDate,
    /// Sum of the durations of every cart item that needs a contiguous block.
    pub total_duration_minutes: i64,
    pub staff: Vec<StaffChoice>,
    /// Start times the customer already picked, echoed back as `is_selected`.
    pub selected: Vec<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub location_id: Uuid,
    pub date: NaiveDate,
    pub total_duration_minutes: i64,
    pub slots: Vec<TimeSlot>,
}
