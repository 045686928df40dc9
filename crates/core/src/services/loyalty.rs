use chrono::NaiveDate;

use super::upstream;
use crate::{
    errors::{TimeError, TimeResult},
    loyalty::{quote_checkout, CheckoutContext},
    models::loyalty::{CheckoutQuote, QuoteRequest},
    providers::LoyaltyProvider,
};

/// Builds a checkout quote for `request` from the customer's wallet and
/// membership. A missing program configuration behaves as an inactive one.
pub async fn quote<P>(
    provider: &P,
    request: &QuoteRequest,
    tax_rate: f64,
    today: NaiveDate,
) -> TimeResult<CheckoutQuote>
where
    P: LoyaltyProvider + ?Sized,
{
    if !request.subtotal.is_finite() || request.subtotal < 0.0 {
        return Err(TimeError::Validation(format!(
            "Subtotal must be a non-negative amount, got {}",
            request.subtotal
        )));
    }

    let settings = provider
        .loyalty_settings()
        .await
        .map_err(upstream("loyalty settings"))?
        .unwrap_or_default();
    let wallet_balance = provider
        .wallet_balance(request.customer_id)
        .await
        .map_err(upstream("wallet balance"))?;
    let membership = provider
        .active_membership(request.customer_id)
        .await
        .map_err(upstream("membership"))?;

    let ctx = CheckoutContext {
        settings: &settings,
        membership: membership.as_ref(),
        wallet_balance,
        tax_rate,
        today,
    };

    Ok(quote_checkout(request.subtotal, request.points_to_redeem, &ctx)?)
}
