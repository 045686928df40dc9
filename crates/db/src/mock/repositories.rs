use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use salonsync_core::{
    errors::TimeResult,
    models::{
        hours::{BookingInterval, LocationHours, ShiftInterval},
        loyalty::{LoyaltySettings, Membership},
    },
    providers::{BookingProvider, LocationHoursProvider, LoyaltyProvider, ShiftProvider},
};
use uuid::Uuid;

// Mock store for testing
mock! {
    pub Store {}

    #[async_trait]
    impl LocationHoursProvider for Store {
        async fn location_hours(
            &self,
            location_id: Uuid,
            day_of_week: u8,
        ) -> TimeResult<Option<LocationHours>>;
    }

    #[async_trait]
    impl ShiftProvider for Store {
        async fn shifts_for(
            &self,
            location_id: Uuid,
            date: NaiveDate,
            staff_ids: &[Uuid],
        ) -> TimeResult<Vec<ShiftInterval>>;
    }

    #[async_trait]
    impl BookingProvider for Store {
        async fn bookings_for(
            &self,
            location_id: Uuid,
            date: NaiveDate,
            staff_ids: &[Uuid],
        ) -> TimeResult<Vec<BookingInterval>>;
    }

    #[async_trait]
    impl LoyaltyProvider for Store {
        async fn loyalty_settings(&self) -> TimeResult<Option<LoyaltySettings>>;

        async fn wallet_balance(&self, customer_id: Uuid) -> TimeResult<i64>;

        async fn active_membership(&self, customer_id: Uuid) -> TimeResult<Option<Membership>>;
    }
}
