use crate::models::DbLocationHours;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_location_hours(
    pool: &Pool<Postgres>,
    location_id: Uuid,
    day_of_week: u8,
) -> Result<Option<DbLocationHours>> {
    tracing::debug!(
        "Getting location hours: location_id={}, day_of_week={}",
        location_id, day_of_week
    );

    let hours = sqlx::query_as::<_, DbLocationHours>(
        r#"
        SELECT id, location_id, day_of_week, open_time, close_time, is_closed
        FROM location_hours
        WHERE location_id = $1 AND day_of_week = $2
        LIMIT 1
        "#,
    )
    .bind(location_id)
    .bind(i16::from(day_of_week))
    .fetch_optional(pool)
    .await?;

    Ok(hours)
}
