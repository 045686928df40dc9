use async_trait::async_trait;
use chrono::NaiveDate;
use salonsync_core::{
    errors::TimeResult,
    models::{
        hours::{BookingInterval, LocationHours, ShiftInterval},
        loyalty::{LoyaltySettings, Membership},
    },
    providers::{BookingProvider, LocationHoursProvider, LoyaltyProvider, ShiftProvider},
};
use uuid::Uuid;

use crate::{repositories, DbPool};

/// Provider implementation reading straight from PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl LocationHoursProvider for PgStore {
    async fn location_hours(
        &self,
        location_id: Uuid,
        day_of_week: u8,
    ) -> TimeResult<Option<LocationHours>> {
        let row =
            repositories::location_hours::get_location_hours(&self.pool, location_id, day_of_week)
                .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl ShiftProvider for PgStore {
    async fn shifts_for(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        staff_ids: &[Uuid],
    ) -> TimeResult<Vec<ShiftInterval>> {
        let rows =
            repositories::shift::get_shifts_for_day(&self.pool, location_id, date, staff_ids)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl BookingProvider for PgStore {
    async fn bookings_for(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        staff_ids: &[Uuid],
    ) -> TimeResult<Vec<BookingInterval>> {
        let rows =
            repositories::booking::get_bookings_for_day(&self.pool, location_id, date, staff_ids)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LoyaltyProvider for PgStore {
    async fn loyalty_settings(&self) -> TimeResult<Option<LoyaltySettings>> {
        let row = repositories::loyalty::get_loyalty_settings(&self.pool).await?;
        Ok(row.map(Into::into))
    }

    async fn wallet_balance(&self, customer_id: Uuid) -> TimeResult<i64> {
        Ok(repositories::loyalty::get_wallet_balance(&self.pool, customer_id).await?)
    }

    async fn active_membership(&self, customer_id: Uuid) -> TimeResult<Option<Membership>> {
        let row = repositories::loyalty::get_active_membership(&self.pool, customer_id).await?;
        Ok(row.map(Into::into))
    }
}
