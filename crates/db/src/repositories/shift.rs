use crate::models::DbStaffShift;
use chrono::{Duration, NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Shifts of `employee_ids` at `location_id` that intersect the calendar day `date`.
pub async fn get_shifts_for_day(
    pool: &Pool<Postgres>,
    location_id: Uuid,
    date: NaiveDate,
    employee_ids: &[Uuid],
) -> Result<Vec<DbStaffShift>> {
    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = day_start + Duration::days(1);

    tracing::debug!(
        "Getting shifts: location_id={}, date={}, employees={}",
        location_id,
        date,
        employee_ids.len()
    );

    let shifts = sqlx::query_as::<_, DbStaffShift>(
        r#"
        SELECT id, employee_id, location_id, start_time, end_time
        FROM staff_shifts
        WHERE employee_id = ANY($1)
          AND location_id = $4
          AND start_time < $3
          AND end_time > $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(employee_ids)
    .bind(day_start)
    .bind(day_end)
    .bind(location_id)
    .fetch_all(pool)
    .await?;

    Ok(shifts)
}
