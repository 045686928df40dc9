//! # Loyalty Handlers
//!
//! Checkout quotes combine the customer's membership discount, the points
//! they want to redeem, and tax. Customers may only quote against their own
//! wallet; staff and above may quote for anyone.

use axum::{extract::State, Json};
use chrono::Local;
use salonsync_core::{
    models::loyalty::{CheckoutQuote, QuoteRequest},
    policy::{Action, Resource, ResourceRef},
    services,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    middleware::{
        auth::{authorize, CurrentSubject},
        error_handling::AppError,
    },
    ApiState,
};

/// Prices a checkout for `customer_id`
///
/// # Endpoint
///
/// ```text
/// POST /api/loyalty/quote
/// {"customer_id": "<uuid>", "subtotal": 200.0, "points_to_redeem": 40}
/// ```
///
/// # Errors
///
/// * `TimeError::Validation` - negative subtotal, or a redemption the
///   program does not allow (inactive, below minimum, above cap)
/// * `TimeError::Authentication` / `TimeError::Authorization` - the caller
///   may not read this customer's wallet
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn quote_checkout(
    State(state): State<Arc<ApiState>>,
    CurrentSubject(subject): CurrentSubject,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<CheckoutQuote>, AppError> {
    authorize(
        &subject,
        &ResourceRef::owned_by(Resource::LoyaltyWallet, payload.customer_id),
        Action::Read,
    )?;

    let today = Local::now().date_naive();
    let quote = services::loyalty::quote(
        state.loyalty.as_ref(),
        &payload,
        state.config.checkout_tax_rate,
        today,
    )
    .await?;

    info!(
        "Quoted checkout for customer {}: total {:.2}, {} points redeemed",
        payload.customer_id, quote.total, quote.points_redeemed
    );

    Ok(Json(quote))
}
