use axum::http::StatusCode;
use eyre::eyre;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use salonsync_core::{
    errors::TimeError,
    models::loyalty::{CheckoutQuote, LoyaltySettings, Membership},
};
use salonsync_db::mock::repositories::MockStore;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{as_user, server_with, test_config};

fn settings() -> LoyaltySettings {
    LoyaltySettings {
        points_per_spend: 0.1,
        point_value: 0.5,
        min_redemption_points: 10,
        max_redemption_points: None,
        max_redemption_percent: None,
        is_active: true,
    }
}

fn store_for(customer_id: Uuid, balance: i64, membership: Option<Membership>) -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_loyalty_settings()
        .returning(|| Ok(Some(settings())));
    store
        .expect_wallet_balance()
        .with(eq(customer_id))
        .returning(move |_| Ok(balance));
    store
        .expect_active_membership()
        .with(eq(customer_id))
        .returning(move |_| Ok(membership.clone()));
    store
}

#[tokio::test]
async fn customer_quotes_own_checkout() {
    let customer_id = Uuid::new_v4();
    let membership = Membership {
        customer_id,
        plan_name: "Gold".to_string(),
        discount_percent: 10.0,
        expires_on: None,
    };
    let config = salonsync_api::config::ApiConfig {
        checkout_tax_rate: 0.08,
        ..test_config()
    };
    let server = server_with(store_for(customer_id, 100, Some(membership)), config);

    let [id_header, role_header] = as_user("customer", customer_id);
    let response = server
        .post("/api/loyalty/quote")
        .add_header(id_header.0, id_header.1)
        .add_header(role_header.0, role_header.1)
        .json(&json!({
            "customer_id": customer_id,
            "subtotal": 200.0,
            "points_to_redeem": 40
        }))
        .await;

    response.assert_status_ok();
    let quote: CheckoutQuote = response.json();
    assert_eq!(quote.membership_discount, 20.0);
    assert_eq!(quote.points_discount, 20.0);
    assert_eq!(quote.tax, 12.8);
    assert_eq!(quote.total, 172.8);
    assert_eq!(quote.points_to_earn, 16);
    assert_eq!(quote.wallet_balance, 100);
}

#[tokio::test]
async fn staff_may_quote_for_any_customer() {
    let customer_id = Uuid::new_v4();
    let server = server_with(store_for(customer_id, 0, None), test_config());

    let [id_header, role_header] = as_user("staff", Uuid::new_v4());
    let response = server
        .post("/api/loyalty/quote")
        .add_header(id_header.0, id_header.1)
        .add_header(role_header.0, role_header.1)
        .json(&json!({ "customer_id": customer_id, "subtotal": 80.0 }))
        .await;

    response.assert_status_ok();
    let quote: CheckoutQuote = response.json();
    assert_eq!(quote.total, 80.0);
    assert_eq!(quote.points_redeemed, 0);
}

#[tokio::test]
async fn other_customers_wallet_is_forbidden() {
    let mut store = MockStore::new();
    store.expect_wallet_balance().never();
    let server = server_with(store, test_config());

    let [id_header, role_header] = as_user("customer", Uuid::new_v4());
    let response = server
        .post("/api/loyalty/quote")
        .add_header(id_header.0, id_header.1)
        .add_header(role_header.0, role_header.1)
        .json(&json!({ "customer_id": Uuid::new_v4(), "subtotal": 50.0 }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn guest_must_sign_in() {
    let server = server_with(MockStore::new(), test_config());

    let response = server
        .post("/api/loyalty/quote")
        .json(&json!({ "customer_id": Uuid::new_v4(), "subtotal": 50.0 }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn redemption_below_minimum_is_rejected() {
    let customer_id = Uuid::new_v4();
    let server = server_with(store_for(customer_id, 100, None), test_config());

    let [id_header, role_header] = as_user("customer", customer_id);
    let response = server
        .post("/api/loyalty/quote")
        .add_header(id_header.0, id_header.1)
        .add_header(role_header.0, role_header.1)
        .json(&json!({
            "customer_id": customer_id,
            "subtotal": 100.0,
            "points_to_redeem": 5
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn wallet_outage_is_retryable() {
    let customer_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_loyalty_settings()
        .returning(|| Ok(Some(settings())));
    store
        .expect_wallet_balance()
        .with(eq(customer_id))
        .times(1)
        .returning(|_| Err(TimeError::Database(eyre!("connection reset"))));
    store.expect_active_membership().never();
    let server = server_with(store, test_config());

    let [id_header, role_header] = as_user("customer", customer_id);
    let response = server
        .post("/api/loyalty/quote")
        .add_header(id_header.0, id_header.1)
        .add_header(role_header.0, role_header.1)
        .json(&json!({ "customer_id": customer_id, "subtotal": 50.0 }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.header("retry-after"), "5");
    let body: Value = response.json();
    assert_eq!(body["retryable"], true);
}
