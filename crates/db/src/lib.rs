//! # SalonSync DB
//!
//! PostgreSQL access for SalonSync. Repositories are plain async functions
//! over a pool; [`store::PgStore`] exposes them through the provider traits
//! of `salonsync-core`, and [`cache::CachedStore`] puts a TTL cache in front
//! of any provider.

pub mod cache;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}
