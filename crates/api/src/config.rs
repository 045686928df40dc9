//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the SalonSync API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SLOT_STEP_MINUTES`: Granularity of generated time slots (default: 30)
//! - `BOOKING_LEAD_MINUTES`: Minimum notice for a booking; unset allows any start
//! - `CACHE_TTL_SECONDS`: Lifetime of cached hours, shifts and bookings (default: 60)
//! - `REALTIME_WEBHOOK_SECRET`: Shared secret expected on change notifications
//! - `CHECKOUT_TAX_RATE`: Tax applied to checkout quotes as a fraction (default: 0.0)

use chrono::{Duration, NaiveDateTime};
use eyre::{eyre, Result, WrapErr};
use salonsync_core::availability::{SlotOptions, DEFAULT_STEP_MINUTES};
use std::env;
use tracing::Level;

/// Longest accepted `BOOKING_LEAD_MINUTES`, one year
pub const MAX_BOOKING_LEAD_MINUTES: i64 = 60 * 24 * 366;

/// Configuration for the SalonSync API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use salonsync_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Step between candidate slot start times, in minutes
    pub slot_step_minutes: u32,

    /// Minimum minutes between now and a bookable start
    pub booking_lead_minutes: Option<i64>,

    /// How long fetched rows stay cached, in seconds
    pub cache_ttl_seconds: u64,

    /// Secret the database platform sends with change notifications
    pub realtime_webhook_secret: Option<String>,

    /// Tax rate applied to checkout quotes, as a fraction
    pub checkout_tax_rate: f64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - A numeric setting cannot be parsed
    /// - SLOT_STEP_MINUTES is zero or CHECKOUT_TAX_RATE is outside 0..=1
    /// - BOOKING_LEAD_MINUTES is negative or longer than a year
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        let cache_ttl_seconds = env::var("CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .wrap_err("Invalid CACHE_TTL_SECONDS value")?;

        // Booking settings
        let slot_step_minutes = env::var("SLOT_STEP_MINUTES")
            .unwrap_or_else(|_| DEFAULT_STEP_MINUTES.to_string())
            .parse()
            .wrap_err("Invalid SLOT_STEP_MINUTES value")?;
        let booking_lead_minutes = env::var("BOOKING_LEAD_MINUTES")
            .ok()
            .map(|raw| raw.parse())
            .transpose()
            .wrap_err("Invalid BOOKING_LEAD_MINUTES value")?;

        // Integration settings
        let realtime_webhook_secret = env::var("REALTIME_WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty());

        // Checkout settings
        let checkout_tax_rate = env::var("CHECKOUT_TAX_RATE")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .wrap_err("Invalid CHECKOUT_TAX_RATE value")?;

        let config = Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            slot_step_minutes,
            booking_lead_minutes,
            cache_ttl_seconds,
            realtime_webhook_secret,
            checkout_tax_rate,
        };
        config.validate()?;

        Ok(config)
    }

    /// Rejects settings that would make the service misbehave
    pub fn validate(&self) -> Result<()> {
        if self.slot_step_minutes == 0 {
            return Err(eyre!("SLOT_STEP_MINUTES must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.checkout_tax_rate) {
            return Err(eyre!(
                "CHECKOUT_TAX_RATE must be a fraction between 0 and 1, got {}",
                self.checkout_tax_rate
            ));
        }
        if let Some(minutes) = self.booking_lead_minutes {
            if minutes < 0 {
                return Err(eyre!("BOOKING_LEAD_MINUTES must not be negative"));
            }
            if minutes > MAX_BOOKING_LEAD_MINUTES {
                return Err(eyre!(
                    "BOOKING_LEAD_MINUTES must be at most {}, got {}",
                    MAX_BOOKING_LEAD_MINUTES,
                    minutes
                ));
            }
        }
        Ok(())
    }

    /// Slot engine options for a request made at `now`
    ///
    /// A lead time that overflows the calendar clamps to the latest
    /// representable instant, leaving no bookable slots.
    pub fn slot_options(&self, now: NaiveDateTime) -> SlotOptions {
        SlotOptions {
            step_minutes: self.slot_step_minutes,
            not_before: self.booking_lead_minutes.map(|minutes| {
                Duration::try_minutes(minutes)
                    .and_then(|lead| now.checked_add_signed(lead))
                    .unwrap_or(NaiveDateTime::MAX)
            }),
        }
    }

    /// Returns the server address as a string
    ///
    /// # Returns
    ///
    /// * `String` - Formatted server address (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Maps a `LOG_LEVEL` value to a tracing level, defaulting to INFO
pub fn parse_log_level(raw: &str) -> Level {
    match raw.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
