//! # Availability Handlers
//!
//! This module serves the list of appointment start times for one location
//! and calendar day. The slot computation itself lives in
//! `salonsync_core::services::availability`; the handler only parses the
//! query string and checks the caller may read availability.
//!
//! ## Query Format
//!
//! ```text
//! GET /api/availability/slots?location_id=<uuid>&date=2024-05-15&duration=90
//!     &staff_ids=any,<uuid>&selected=09:00,10:30
//! ```
//!
//! - `staff_ids` holds one entry per cart item, `any` (or empty) when the
//!   customer did not pick a stylist. Omitting it means any staff.
//! - `selected` lists start times the customer already picked; matching
//!   slots come back with `is_selected` set.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use salonsync_core::{
    errors::TimeError,
    models::{
        availability::{AvailabilityRequest, SlotsResponse, StaffChoice},
        time_slot::parse_wall_clock,
    },
    policy::{Action, Resource, ResourceRef},
    services,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    middleware::{
        auth::{authorize, CurrentSubject},
        error_handling::AppError,
    },
    ApiState,
};

/// Query parameters for the slots endpoint
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub location_id: Uuid,

    pub date: NaiveDate,

    /// Total minutes of every service in the cart
    pub duration: i64,

    /// Comma-separated staff choices, `any` or a staff UUID per cart item
    pub staff_ids: Option<String>,

    /// Comma-separated `HH:MM` start times already chosen
    pub selected: Option<String>,
}

impl SlotsQuery {
    /// Parses the comma-separated fields into an [`AvailabilityRequest`]
    ///
    /// # Errors
    ///
    /// * `TimeError::Validation` - a staff entry is not `any` or a UUID, or a
    ///   selected time is not `HH:MM`
    pub fn into_request(self) -> Result<AvailabilityRequest, TimeError> {
        let staff = self
            .staff_ids
            .as_deref()
            .map(split_list)
            .unwrap_or_default()
            .into_iter()
            .map(|raw| {
                raw.parse::<StaffChoice>().map_err(|_| {
                    TimeError::Validation(format!(
                        "Invalid staff id {:?}. Must be \"any\" or a UUID",
                        raw
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let selected = self
            .selected
            .as_deref()
            .map(split_list)
            .unwrap_or_default()
            .into_iter()
            .map(|raw| {
                parse_wall_clock(raw).map_err(|_| {
                    TimeError::Validation(format!("Invalid selected time {:?}. Must be HH:MM", raw))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AvailabilityRequest {
            location_id: self.location_id,
            date: self.date,
            total_duration_minutes: self.duration,
            staff,
            selected,
        })
    }
}

/// Splits a comma-separated list. Blank entries are kept so that
/// `staff_ids=,<uuid>` still means "any staff" for the first item.
fn split_list(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::trim).collect()
}

/// Lists the bookable start times for a location and day
///
/// # Errors
///
/// * `TimeError::Validation` - malformed query values or a negative duration
/// * `TimeError::Authentication` - malformed identity headers
/// * `TimeError::Unavailable` - hours, shifts or bookings could not be loaded;
///   answered with 503 and a `Retry-After` header
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    CurrentSubject(subject): CurrentSubject,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    authorize(&subject, &ResourceRef::new(Resource::Availability), Action::Read)?;

    let request = query.into_request()?;
    let options = state.config.slot_options(Local::now().naive_local());

    debug!(
        "Computing slots for location {} on {} ({} minutes, {} staff choices)",
        request.location_id,
        request.date,
        request.total_duration_minutes,
        request.staff.len()
    );

    let slots =
        services::availability::available_slots(state.availability.as_ref(), &request, &options)
            .await?;

    Ok(Json(SlotsResponse {
        location_id: request.location_id,
        date: request.date,
        total_duration_minutes: request.total_duration_minutes,
        slots,
    }))
}
