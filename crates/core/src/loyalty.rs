//! # Loyalty and Membership Arithmetic
//!
//! Pure calculations used at checkout. Balance mutations happen in the
//! database; nothing here persists anything.
//!
//! Amounts are `f64` currency units rounded to cents at each step that is
//! shown to a customer. Point counts are whole numbers.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    errors::TimeError,
    models::loyalty::{CheckoutQuote, LoyaltySettings, Membership},
};

// Absorbs binary representation error such as 0.29 * 100 = 28.999999999999996.
const EPSILON: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoyaltyError {
    #[error("Loyalty program is not active")]
    Inactive,

    #[error("Points to redeem cannot be negative")]
    Negative,

    #[error("Minimum redemption is {minimum} points, requested {requested}")]
    BelowMinimum { requested: i64, minimum: i64 },

    #[error("At most {maximum} points can be redeemed on this order, requested {requested}")]
    AboveMaximum { requested: i64, maximum: i64 },
}

impl From<LoyaltyError> for TimeError {
    fn from(err: LoyaltyError) -> Self {
        TimeError::Validation(err.to_string())
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Points accrued on `eligible_amount`: `floor(eligible_amount * points_per_spend)`.
pub fn points_to_earn(eligible_amount: f64, settings: &LoyaltySettings) -> i64 {
    if !settings.is_active || eligible_amount <= 0.0 || settings.points_per_spend <= 0.0 {
        return 0;
    }
    (eligible_amount * settings.points_per_spend + EPSILON).floor() as i64
}

/// Currency value of `points`.
pub fn points_value(points: i64, settings: &LoyaltySettings) -> f64 {
    round_cents(points.max(0) as f64 * settings.point_value)
}

/// Largest redemption allowed against `subtotal`.
///
/// The cap is the smallest of the wallet balance, the fixed cap, the
/// percentage-of-subtotal cap and the points needed to bring the subtotal to
/// zero. A cap below the minimum redemption means nothing can be redeemed.
pub fn max_redeemable_points(balance: i64, subtotal: f64, settings: &LoyaltySettings) -> i64 {
    if !settings.is_active
        || balance <= 0
        || subtotal <= 0.0
        || settings.point_value <= 0.0
        || balance < settings.min_redemption_points
    {
        return 0;
    }

    let mut cap = balance;
    if let Some(fixed) = settings.max_redemption_points {
        cap = cap.min(fixed);
    }
    if let Some(percent) = settings.max_redemption_percent {
        let limit = subtotal * percent.clamp(0.0, 100.0) / 100.0;
        cap = cap.min((limit / settings.point_value + EPSILON).floor() as i64);
    }
    let to_zero = (subtotal / settings.point_value - EPSILON).ceil() as i64;
    cap = cap.min(to_zero);

    if cap < settings.min_redemption_points {
        0
    } else {
        cap.max(0)
    }
}

/// Discount produced by redeeming `points`, never more than `subtotal`.
pub fn redeem(
    points: i64,
    balance: i64,
    subtotal: f64,
    settings: &LoyaltySettings,
) -> Result<f64, LoyaltyError> {
    if points == 0 {
        return Ok(0.0);
    }
    if points < 0 {
        return Err(LoyaltyError::Negative);
    }
    if !settings.is_active {
        return Err(LoyaltyError::Inactive);
    }
    if points < settings.min_redemption_points {
        return Err(LoyaltyError::BelowMinimum {
            requested: points,
            minimum: settings.min_redemption_points,
        });
    }

    let maximum = max_redeemable_points(balance, subtotal, settings);
    if points > maximum {
        return Err(LoyaltyError::AboveMaximum {
            requested: points,
            maximum,
        });
    }

    Ok(points_value(points, settings).min(round_cents(subtotal)))
}

/// Membership discount on `subtotal`. The percentage is clamped to 0..=100.
pub fn membership_discount(subtotal: f64, discount_percent: f64) -> f64 {
    round_cents(subtotal.max(0.0) * discount_percent.clamp(0.0, 100.0) / 100.0)
}

/// Inputs of a checkout quote besides the subtotal and redemption request.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutContext<'a> {
    pub settings: &'a LoyaltySettings,
    pub membership: Option<&'a Membership>,
    pub wallet_balance: i64,
    /// Fraction, e.g. `0.08` for 8%.
    pub tax_rate: f64,
    pub today: NaiveDate,
}

/// Applies membership discount, then points, then tax.
///
/// Points are earned on the amount paid before tax.
pub fn quote_checkout(
    subtotal: f64,
    points_to_redeem: i64,
    ctx: &CheckoutContext<'_>,
) -> Result<CheckoutQuote, LoyaltyError> {
    let subtotal = round_cents(subtotal.max(0.0));

    let membership_discount = ctx
        .membership
        .filter(|membership| membership.is_active_on(ctx.today))
        .map_or(0.0, |membership| membership_discount(subtotal, membership.discount_percent));
    let after_membership = round_cents(subtotal - membership_discount);

    let max_redeemable_points =
        max_redeemable_points(ctx.wallet_balance, after_membership, ctx.settings);
    let points_discount = redeem(
        points_to_redeem,
        ctx.wallet_balance,
        after_membership,
        ctx.settings,
    )?;

    let net = round_cents(after_membership - points_discount).max(0.0);
    let tax = round_cents(net * ctx.tax_rate.max(0.0));

    Ok(CheckoutQuote {
        subtotal,
        membership_discount,
        points_redeemed: points_to_redeem,
        points_discount,
        max_redeemable_points,
        tax,
        total: round_cents(net + tax),
        points_to_earn: points_to_earn(net, ctx.settings),
        wallet_balance: ctx.wallet_balance,
    })
}
