use tracing::debug;

use super::upstream;
use crate::{
    availability::{compute_slots, HoursSource, SlotOptions, StaffingMode},
    errors::{TimeError, TimeResult},
    models::{availability::AvailabilityRequest, hours::weekday_index, time_slot::TimeSlot},
    providers::AvailabilitySource,
};

/// Fetches the data for `request` and runs the slot engine over it.
///
/// # Errors
///
/// * `TimeError::Validation` - negative or oversized duration
/// * `TimeError::Unavailable` - a provider failed; the caller should keep its
///   previous slots and offer a retry
pub async fn available_slots<S>(
    source: &S,
    request: &AvailabilityRequest,
    options: &SlotOptions,
) -> TimeResult<Vec<TimeSlot>>
where
    S: AvailabilitySource + ?Sized,
{
    let duration = validate_duration(request.total_duration_minutes)?;
    if duration == 0 {
        return Ok(Vec::new());
    }

    let mode = StaffingMode::from_choices(&request.staff);
    let hours = match &mode {
        StaffingMode::AnyStaff => {
            // weekday_index is always within 0..=6
            let weekday = weekday_index(request.date) as u8;
            let location = source
                .location_hours(request.location_id, weekday)
                .await
                .map_err(upstream("location hours"))?;
            HoursSource {
                location,
                shifts: Vec::new(),
            }
        }
        StaffingMode::SpecificStaff(ids) => {
            let shifts = source
                .shifts_for(request.location_id, request.date, ids)
                .await
                .map_err(upstream("staff shifts"))?;
            HoursSource {
                location: None,
                shifts,
            }
        }
    };

    let bookings = source
        .bookings_for(request.location_id, request.date, mode.staff_ids())
        .await
        .map_err(upstream("bookings"))?;

    debug!(
        "Computing slots: location={}, date={}, duration={}, mode={:?}, bookings={}",
        request.location_id,
        request.date,
        duration,
        mode,
        bookings.len()
    );

    Ok(compute_slots(
        request.date,
        duration,
        &mode,
        &hours,
        &bookings,
        &request.selected,
        options,
    ))
}

/// Minutes in a day; no block can be longer.
const MAX_DURATION_MINUTES: i64 = 24 * 60;

fn validate_duration(minutes: i64) -> TimeResult<u32> {
    if minutes < 0 {
        return Err(TimeError::Validation(format!(
            "Total duration must not be negative, got {} minutes",
            minutes
        )));
    }
    if minutes > MAX_DURATION_MINUTES {
        return Err(TimeError::Validation(format!(
            "Total duration must be at most {} minutes, got {}",
            MAX_DURATION_MINUTES, minutes
        )));
    }
    // Bounded by MAX_DURATION_MINUTES above.
    Ok(minutes as u32)
}
