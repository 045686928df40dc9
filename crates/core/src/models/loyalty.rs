use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Program-wide loyalty configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltySettings {
    /// Points earned per currency unit of eligible spend.
    pub points_per_spend: f64,
    /// Currency value of a single point when redeemed.
    pub point_value: f64,
    /// Redemptions below this many points are refused.
    pub min_redemption_points: i64,
    /// Fixed cap on points per transaction.
    pub max_redemption_points: Option<i64>,
    /// Cap expressed as a percentage of the subtotal.
    pub max_redemption_percent: Option<f64>,
    pub is_active: bool,
}

impl Default for LoyaltySettings {
    fn default() -> Self {
        Self {
            points_per_spend: 0.0,
            point_value: 0.0,
            min_redemption_points: 0,
            max_redemption_points: None,
            max_redemption_percent: None,
            is_active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub customer_id: Uuid,
    pub plan_name: String,
    pub discount_percent: f64,
    pub expires_on: Option<NaiveDate>,
}

impl Membership {
    /// A membership without an expiry date never lapses.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.expires_on.is_none_or(|expires| date <= expires)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub customer_id: Uuid,
    pub subtotal: f64,
    #[serde(default)]
    pub points_to_redeem: i64,
}

/// Price breakdown shown at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    pub subtotal: f64,
    pub membership_discount: f64,
    pub points_redeemed: i64,
    pub points_discount: f64,
    pub max_redeemable_points: i64,
    pub tax: f64,
    pub total: f64,
    pub points_to_earn: i64,
    pub wallet_balance: i64,
}
