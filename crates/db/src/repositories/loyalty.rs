use crate::models::{DbLoyaltySettings, DbMembership};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// The most recently updated program configuration.
pub async fn get_loyalty_settings(pool: &Pool<Postgres>) -> Result<Option<DbLoyaltySettings>> {
    let settings = sqlx::query_as::<_, DbLoyaltySettings>(
        r#"
        SELECT id, points_per_spend, point_value, min_redemption_points,
               max_redemption_points, max_redemption_percent, is_active, updated_at
        FROM loyalty_settings
        ORDER BY updated_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

/// Points balance of a customer; customers without a wallet have zero.
pub async fn get_wallet_balance(pool: &Pool<Postgres>, customer_id: Uuid) -> Result<i64> {
    let balance = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT points_balance
        FROM loyalty_wallets
        WHERE customer_id = $1
        "#,
    )
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;

    Ok(balance.unwrap_or(0))
}

/// The customer's best active membership, if any.
pub async fn get_active_membership(
    pool: &Pool<Postgres>,
    customer_id: Uuid,
) -> Result<Option<DbMembership>> {
    let membership = sqlx::query_as::<_, DbMembership>(
        r#"
        SELECT m.customer_id, p.name AS plan_name, p.discount_percent, m.expires_on
        FROM memberships m
        JOIN membership_plans p ON p.id = m.plan_id
        WHERE m.customer_id = $1
          AND m.status = 'active'
          AND (m.expires_on IS NULL OR m.expires_on >= CURRENT_DATE)
        ORDER BY p.discount_percent DESC
        LIMIT 1
        "#,
    )
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;

    Ok(membership)
}
