//! Read-only data sources consumed by the services.
//!
//! Implementations live in `salonsync-db`; tests substitute mocks.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::TimeResult,
    models::{
        hours::{BookingInterval, LocationHours, ShiftInterval},
        loyalty::{LoyaltySettings, Membership},
    },
};

#[async_trait]
pub trait LocationHoursProvider: Send + Sync {
    /// Opening hours of `location_id` on `day_of_week` (0 = Sunday).
    async fn location_hours(
        &self,
        location_id: Uuid,
        day_of_week: u8,
    ) -> TimeResult<Option<LocationHours>>;
}

#[async_trait]
pub trait ShiftProvider: Send + Sync {
    /// Shifts of `staff_ids` at `location_id` that intersect `date`.
    async fn shifts_for(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        staff_ids: &[Uuid],
    ) -> TimeResult<Vec<ShiftInterval>>;
}

#[async_trait]
pub trait BookingProvider: Send + Sync {
    /// Committed bookings that intersect `date`. An empty `staff_ids` means
    /// every booking at `location_id`; otherwise the bookings of those staff
    /// at any location plus unassigned bookings at `location_id`.
    async fn bookings_for(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        staff_ids: &[Uuid],
    ) -> TimeResult<Vec<BookingInterval>>;
}

#[async_trait]
pub trait LoyaltyProvider: Send + Sync {
    /// Program settings, `None` when no program is configured.
    async fn loyalty_settings(&self) -> TimeResult<Option<LoyaltySettings>>;

    async fn wallet_balance(&self, customer_id: Uuid) -> TimeResult<i64>;

    async fn active_membership(&self, customer_id: Uuid) -> TimeResult<Option<Membership>>;
}

/// Everything the availability service reads.
pub trait AvailabilitySource: LocationHoursProvider + ShiftProvider + BookingProvider {}

impl<T> AvailabilitySource for T where T: LocationHoursProvider + ShiftProvider + BookingProvider {}
