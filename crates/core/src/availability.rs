//! # Availability Engine
//!
//! Produces the bookable start times for one calendar day by intersecting the
//! governing hours with already committed bookings.
//!
//! ## Algorithm
//!
//! 1. Pick the governing windows. With [`StaffingMode::AnyStaff`] this is the
//!    location's opening hours; with [`StaffingMode::SpecificStaff`] it is one
//!    window per shift of the selected staff, clipped to the day.
//! 2. Walk each window in `step_minutes` increments, keeping every start whose
//!    block of `total_duration_minutes` still ends at or before the window end.
//! 3. Flag a start unavailable when `[start, start + duration)` overlaps a
//!    booking in scope (half-open, so back-to-back appointments are allowed)
//!    or when it begins before `not_before`.
//! 4. Merge windows by start time and return the slots in ascending order.
//!
//! The computation is pure: identical inputs always give an identical list,
//! and missing data yields an empty list instead of an error.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::models::{
    availability::StaffChoice,
    hours::{BookingInterval, LocationHours, ShiftInterval},
    time_slot::TimeSlot,
};

/// Slot granularity used when nothing else is configured.
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// Which hours regime governs slot generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffingMode {
    /// Any available staff member; the location's opening hours apply.
    AnyStaff,
    /// Only the listed staff; their shifts apply.
    SpecificStaff(Vec<Uuid>),
}

impl StaffingMode {
    /// Builds the mode from per-item staff choices.
    ///
    /// When every choice is [`StaffChoice::Any`] (or there are none) the
    /// result is [`StaffingMode::AnyStaff`].
    pub fn from_choices(choices: &[StaffChoice]) -> Self {
        let mut ids: Vec<Uuid> = choices
            .iter()
            .filter_map(|choice| match choice {
                StaffChoice::Staff(id) => Some(*id),
                StaffChoice::Any => None,
            })
            .collect();
        ids.sort();
        ids.dedup();

        if ids.is_empty() {
            StaffingMode::AnyStaff
        } else {
            StaffingMode::SpecificStaff(ids)
        }
    }

    /// Staff ids whose shifts matter, empty for `AnyStaff`.
    pub fn staff_ids(&self) -> &[Uuid] {
        match self {
            StaffingMode::AnyStaff => &[],
            StaffingMode::SpecificStaff(ids) => ids,
        }
    }

    /// Whether a booking can block a slot under this mode.
    ///
    /// Unassigned bookings block everyone.
    pub fn covers(&self, booking: &BookingInterval) -> bool {
        match self {
            StaffingMode::AnyStaff => true,
            StaffingMode::SpecificStaff(ids) => {
                booking.employee_id.is_none_or(|id| ids.contains(&id))
            }
        }
    }
}

/// Hours data fetched for a day. The staffing mode decides which half is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoursSource {
    pub location: Option<LocationHours>,
    pub shifts: Vec<ShiftInterval>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOptions {
    pub step_minutes: u32,
    /// Slots starting earlier than this are listed but never available.
    pub not_before: Option<NaiveDateTime>,
}

impl Default for SlotOptions {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            not_before: None,
        }
    }
}

/// Half-open interval inside which slots may be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Resolves the governing windows for `date`.
pub fn governing_windows(date: NaiveDate, mode: &StaffingMode, hours: &HoursSource) -> Vec<Window> {
    match mode {
        StaffingMode::AnyStaff => hours
            .location
            .iter()
            .filter(|record| record.is_open_on(date) && record.open_time < record.close_time)
            .map(|record| Window {
                start: date.and_time(record.open_time),
                end: date.and_time(record.close_time),
            })
            .collect(),
        StaffingMode::SpecificStaff(ids) => {
            let day_start = date.and_time(NaiveTime::MIN);
            let day_end = day_start + Duration::days(1);

            hours
                .shifts
                .iter()
                .filter(|shift| ids.contains(&shift.employee_id))
                .filter_map(|shift| {
                    let start = shift.start_time.max(day_start);
                    let end = shift.end_time.min(day_end);
                    (start < end).then_some(Window { start, end })
                })
                .collect()
        }
    }
}

/// Computes the ordered slot list for one day.
///
/// Returns an empty list when the duration or step is zero or no governing
/// window exists.
pub fn compute_slots(
    date: NaiveDate,
    total_duration_minutes: u32,
    mode: &StaffingMode,
    hours: &HoursSource,
    bookings: &[BookingInterval],
    selected: &[NaiveTime],
    options: &SlotOptions,
) -> Vec<TimeSlot> {
    if total_duration_minutes == 0 || options.step_minutes == 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(total_duration_minutes));
    let step = Duration::minutes(i64::from(options.step_minutes));
    let in_scope: Vec<&BookingInterval> = bookings.iter().filter(|b| mode.covers(b)).collect();

    let mut slots: BTreeMap<NaiveTime, TimeSlot> = BTreeMap::new();
    for window in governing_windows(date, mode, hours) {
        let mut start = window.start;
        while start + duration <= window.end {
            let end = start + duration;
            let is_available = options.not_before.is_none_or(|earliest| start >= earliest)
                && !in_scope.iter().any(|booking| booking.overlaps(start, end));

            let key = start.time();
            slots
                .entry(key)
                .and_modify(|slot| slot.is_available |= is_available)
                .or_insert_with(|| TimeSlot {
                    start_time: key,
                    end_time: end.time(),
                    is_available,
                    is_selected: selected.contains(&key),
                });

            start += step;
        }
    }

    slots.into_values().collect()
}
