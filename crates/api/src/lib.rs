//! # SalonSync API
//!
//! The API crate provides the web server for the SalonSync booking service.
//! It exposes appointment availability, checkout quotes with loyalty points,
//! permission checks, and the change notification hook that keeps cached
//! reads fresh.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into calls on the core services
//! - **Middleware**: Provide cross-cutting concerns like identifying the caller and error handling
//! - **Config**: Handle environment and application configuration
//!
//! Handlers never talk to the database directly. They go through the provider
//! traits from `salonsync-core`, backed in production by a cached PostgreSQL
//! store and in tests by mocks.

/// Configuration module for API settings
pub mod config;
/// Request handlers that call into the core services
pub mod handlers;
/// Middleware for caller identity, permissions, and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use eyre::Result;
use salonsync_core::{
    events::ChangeFeed,
    providers::{AvailabilitySource, LoyaltyProvider},
};
use salonsync_db::{cache::CachedStore, store::PgStore, DbPool};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers
///
/// Data access goes through trait objects so the same router serves a
/// database-backed store in production and mocks in tests.
pub struct ApiState {
    /// Source of location hours, staff shifts and bookings
    pub availability: Arc<dyn AvailabilitySource>,
    /// Source of loyalty settings, wallets and memberships
    pub loyalty: Arc<dyn LoyaltyProvider>,
    /// Change notifications received from the database platform
    pub feed: ChangeFeed,
    /// Runtime settings
    pub config: config::ApiConfig,
}

/// Builds the application router with every endpoint attached
///
/// Layers that depend on the deployment (CORS, timeouts, tracing) are added
/// by [`start_server`].
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Appointment availability endpoints
        .merge(routes::availability::routes())
        // Checkout and loyalty endpoints
        .merge(routes::loyalty::routes())
        // Permission checks
        .merge(routes::policy::routes())
        // Change notifications
        .merge(routes::realtime::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Reads go through a [`CachedStore`] whose entries are evicted by events
/// posted to the realtime endpoint.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use salonsync_api::{config::ApiConfig, start_server};
///
/// let config = ApiConfig::from_env()?;
/// let db_pool = salonsync_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Wire the cached store to the change feed
    let feed = ChangeFeed::new();
    let store = CachedStore::new(
        PgStore::new(db_pool),
        Duration::from_secs(config.cache_ttl_seconds),
    );
    // Lives as long as the feed; dropping the handle does not unsubscribe.
    let _subscription = store.watch(&feed);
    let store = Arc::new(store);

    if config.realtime_webhook_secret.is_none() {
        warn!("REALTIME_WEBHOOK_SECRET is not set, change notifications are unauthenticated");
    }

    let addr = config.server_addr();
    let cors_origins = config.cors_origins.clone();
    let request_timeout = Duration::from_secs(config.request_timeout);

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        availability: store.clone(),
        loyalty: store,
        feed,
        config,
    });

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &cors_origins {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
                HeaderName::from_static(USER_ID_HEADER),
                HeaderName::from_static(USER_ROLE_HEADER),
            ])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| match origin.parse::<HeaderValue>() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            warn!("Ignoring invalid CORS origin {}", origin);
                            None
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout)),
    );

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
