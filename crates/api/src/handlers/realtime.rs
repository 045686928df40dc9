//! # Realtime Handlers
//!
//! The database platform posts a notification here whenever a watched table
//! changes. Each notification is published on the shared change feed, which
//! evicts the affected cache entries so the next read sees fresh rows.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use salonsync_core::{errors::TimeError, events::ChangeEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{middleware::error_handling::AppError, ApiState};

/// Header carrying the shared webhook secret
pub const SECRET_HEADER: &str = "x-realtime-secret";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeAck {
    /// Handlers the event was delivered to
    pub delivered_to: usize,
}

/// Compares two secrets in time that depends only on their lengths
fn secrets_match(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Accepts one change notification
///
/// # Errors
///
/// * `TimeError::Authentication` - a secret is configured and the request
///   does not carry it
pub async fn receive_change(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(event): Json<ChangeEvent>,
) -> Result<(StatusCode, Json<ChangeAck>), AppError> {
    if let Some(expected) = &state.config.realtime_webhook_secret {
        let provided = headers.get(SECRET_HEADER).and_then(|value| value.to_str().ok());
        let matches = provided.is_some_and(|provided| secrets_match(provided, expected));
        if !matches {
            warn!("Rejected change notification with missing or wrong secret");
            return Err(AppError(TimeError::Authentication(
                "Invalid realtime secret".to_string(),
            )));
        }
    }

    info!(
        "Change on {} ({:?}) date={:?} location={:?}",
        event.table, event.kind, event.date, event.location_id
    );

    let delivered_to = state.feed.publish(&event);

    Ok((StatusCode::ACCEPTED, Json(ChangeAck { delivered_to })))
}
