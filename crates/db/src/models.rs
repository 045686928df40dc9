use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use salonsync_core::models::{
    hours::{BookingInterval, LocationHours, ShiftInterval},
    loyalty::{LoyaltySettings, Membership},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLocationHours {
    pub id: Uuid,
    pub location_id: Uuid,
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffShift {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub location_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub location_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLoyaltySettings {
    pub id: Uuid,
    pub points_per_spend: f64,
    pub point_value: f64,
    pub min_redemption_points: i64,
    pub max_redemption_points: Option<i64>,
    pub max_redemption_percent: Option<f64>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMembership {
    pub customer_id: Uuid,
    pub plan_name: String,
    pub discount_percent: f64,
    pub expires_on: Option<NaiveDate>,
}

impl From<DbLocationHours> for LocationHours {
    fn from(row: DbLocationHours) -> Self {
        Self {
            // The column carries a CHECK (day_of_week BETWEEN 0 AND 6).
            day_of_week: row.day_of_week.clamp(0, 6) as u8,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed,
        }
    }
}

impl From<DbStaffShift> for ShiftInterval {
    fn from(row: DbStaffShift) -> Self {
        Self {
            start_time: row.start_time,
            end_time: row.end_time,
            employee_id: row.employee_id,
        }
    }
}

impl From<DbBooking> for BookingInterval {
    fn from(row: DbBooking) -> Self {
        Self {
            start_time: row.start_time,
            end_time: row.end_time,
            employee_id: row.employee_id,
        }
    }
}

impl From<DbLoyaltySettings> for LoyaltySettings {
    fn from(row: DbLoyaltySettings) -> Self {
        Self {
            points_per_spend: row.points_per_spend,
            point_value: row.point_value,
            min_redemption_points: row.min_redemption_points,
            max_redemption_points: row.max_redemption_points,
            max_redemption_percent: row.max_redemption_percent,
            is_active: row.is_active,
        }
    }
}

impl From<DbMembership> for Membership {
    fn from(row: DbMembership) -> Self {
        Self {
            customer_id: row.customer_id,
            plan_name: row.plan_name,
            discount_percent: row.discount_percent,
            expires_on: row.expires_on,
        }
    }
}
