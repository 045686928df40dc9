use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Secondary indexes. Prepared statements accept a single command each.
const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_staff_shifts_employee_start ON staff_shifts(employee_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_staff_shifts_location_start ON staff_shifts(location_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_location_start ON bookings(location_id, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_employee_id ON bookings(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_memberships_customer_id ON memberships(customer_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create location_hours table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS location_hours (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            location_id UUID NOT NULL,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            open_time TIME NOT NULL,
            close_time TIME NOT NULL,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            UNIQUE (location_id, day_of_week)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_shifts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_shifts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL,
            location_id UUID NOT NULL,
            start_time TIMESTAMP NOT NULL,
            end_time TIMESTAMP NOT NULL,
            CONSTRAINT valid_shift_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            location_id UUID NOT NULL,
            customer_id UUID NULL,
            employee_id UUID NULL,
            start_time TIMESTAMP NOT NULL,
            end_time TIMESTAMP NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'confirmed',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create loyalty_settings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS loyalty_settings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            points_per_spend DOUBLE PRECISION NOT NULL DEFAULT 0,
            point_value DOUBLE PRECISION NOT NULL DEFAULT 0,
            min_redemption_points BIGINT NOT NULL DEFAULT 0,
            max_redemption_points BIGINT NULL,
            max_redemption_percent DOUBLE PRECISION NULL,
            is_active BOOLEAN NOT NULL DEFAULT FALSE,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create loyalty_wallets table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS loyalty_wallets (
            customer_id UUID PRIMARY KEY,
            points_balance BIGINT NOT NULL DEFAULT 0 CHECK (points_balance >= 0),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create membership_plans table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS membership_plans (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            discount_percent DOUBLE PRECISION NOT NULL DEFAULT 0
                CHECK (discount_percent BETWEEN 0 AND 100)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create memberships table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memberships (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_id UUID NOT NULL,
            plan_id UUID NOT NULL REFERENCES membership_plans(id),
            status VARCHAR(32) NOT NULL DEFAULT 'active',
            expires_on DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query
    for statement in INDEX_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
