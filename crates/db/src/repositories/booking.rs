use crate::models::DbBooking;
use chrono::{Duration, NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Bookings that block time on `date`.
///
/// With an empty `employee_ids` every booking at `location_id` is returned.
/// Otherwise the bookings of those employees at any location are returned,
/// together with the unassigned bookings at `location_id`. Cancelled bookings never block time.
pub async fn get_bookings_for_day(
    pool: &Pool<Postgres>,
    location_id: Uuid,
    date: NaiveDate,
    employee_ids: &[Uuid],
) -> Result<Vec<DbBooking>> {
    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = day_start + Duration::days(1);

    tracing::debug!(
        "Getting bookings: location_id={}, date={}, employees={}",
        location_id,
        date,
        employee_ids.len()
    );

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, location_id, customer_id, employee_id, start_time, end_time, status
        FROM bookings
        WHERE start_time < $3
          AND end_time > $2
          AND status <> 'cancelled'
          AND (
            (location_id = $1 AND (cardinality($4::uuid[]) = 0 OR employee_id IS NULL))
            OR employee_id = ANY($4::uuid[])
          )
        ORDER BY start_time ASC
        "#,
    )
    .bind(location_id)
    .bind(day_start)
    .bind(day_end)
    .bind(employee_ids)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
