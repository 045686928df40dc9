use std::{sync::Arc, time::Duration};

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime};
use salonsync_api::{build_router, config::ApiConfig, ApiState};
use salonsync_core::{
    events::ChangeFeed,
    models::hours::{weekday_index, LocationHours},
};
use salonsync_db::{cache::CachedStore, mock::repositories::MockStore};
use tracing::Level;
use uuid::Uuid;

pub fn test_config() -> ApiConfig {
    ApiConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        log_level: Level::DEBUG,
        cors_origins: None,
        request_timeout: 30,
        slot_step_minutes: 30,
        booking_lead_minutes: None,
        cache_ttl_seconds: 60,
        realtime_webhook_secret: None,
        checkout_tax_rate: 0.0,
    }
}

/// Server whose providers are `store` directly, without caching.
pub fn server_with(store: MockStore, config: ApiConfig) -> TestServer {
    let store = Arc::new(store);
    let state = Arc::new(ApiState {
        availability: store.clone(),
        loyalty: store,
        feed: ChangeFeed::new(),
        config,
    });
    TestServer::new(build_router(state)).unwrap()
}

/// Server reading through a [`CachedStore`] that watches the server's feed,
/// wired the same way as in production.
pub fn cached_server_with(store: MockStore, config: ApiConfig) -> TestServer {
    let feed = ChangeFeed::new();
    let store = CachedStore::new(store, Duration::from_secs(config.cache_ttl_seconds));
    let _subscription = store.watch(&feed);
    let store = Arc::new(store);
    let state = Arc::new(ApiState {
        availability: store.clone(),
        loyalty: store,
        feed,
        config,
    });
    TestServer::new(build_router(state)).unwrap()
}

// A Wednesday.
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

pub fn t(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
}

pub fn open_hours(open: &str, close: &str) -> LocationHours {
    LocationHours {
        day_of_week: weekday_index(day()) as u8,
        open_time: t(open),
        close_time: t(close),
        is_closed: false,
    }
}

pub fn header(name: &'static str) -> HeaderName {
    HeaderName::from_static(name)
}

pub fn value(raw: &str) -> HeaderValue {
    HeaderValue::from_str(raw).unwrap()
}

/// Identity headers for a signed-in caller.
pub fn as_user(role: &str, user_id: Uuid) -> [(HeaderName, HeaderValue); 2] {
    [
        (header("x-user-id"), value(&user_id.to_string())),
        (header("x-user-role"), value(role)),
    ]
}
