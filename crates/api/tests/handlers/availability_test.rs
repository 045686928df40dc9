use axum::http::StatusCode;
use chrono::NaiveDateTime;
use eyre::eyre;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use salonsync_core::{
    errors::TimeError,
    models::{
        availability::SlotsResponse,
        hours::{BookingInterval, ShiftInterval},
    },
};
use salonsync_db::mock::repositories::MockStore;
use serde_json::Value;
use uuid::Uuid;

use crate::test_utils::{day, open_hours, server_with, t, test_config};

fn at(raw: &str) -> NaiveDateTime {
    day().and_time(t(raw))
}

fn starts(response: &SlotsResponse) -> Vec<(String, bool)> {
    response
        .slots
        .iter()
        .map(|slot| (slot.start_time.format("%H:%M").to_string(), slot.is_available))
        .collect()
}

#[tokio::test]
async fn lists_location_slots_around_bookings() {
    let location_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_location_hours()
        .with(eq(location_id), eq(3u8))
        .times(1)
        .returning(|_, _| Ok(Some(open_hours("09:00", "12:00"))));
    store
        .expect_bookings_for()
        .withf(move |id, date, staff| *id == location_id && *date == day() && staff.is_empty())
        .times(1)
        .returning(|_, _, _| {
            Ok(vec![BookingInterval {
                start_time: at("10:00"),
                end_time: at("11:00"),
                employee_id: None,
            }])
        });
    store.expect_shifts_for().never();

    let server = server_with(store, test_config());
    let response = server
        .get("/api/availability/slots")
        .add_query_param("location_id", location_id)
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .await;

    response.assert_status_ok();
    let body: SlotsResponse = response.json();
    assert_eq!(body.location_id, location_id);
    assert_eq!(body.total_duration_minutes, 60);
    assert_eq!(
        starts(&body),
        vec![
            ("09:00".to_string(), true),
            ("09:30".to_string(), false),
            ("10:00".to_string(), false),
            ("10:30".to_string(), false),
            ("11:00".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn specific_staff_uses_shifts() {
    let location_id = Uuid::new_v4();
    let stylist = Uuid::new_v4();
    let mut store = MockStore::new();
    store.expect_location_hours().never();
    store
        .expect_shifts_for()
        .withf(move |loc, date, staff| *loc == location_id && *date == day() && *staff == [stylist])
        .times(1)
        .returning(move |_, _, _| {
            Ok(vec![ShiftInterval {
                start_time: at("13:00"),
                end_time: at("15:00"),
                employee_id: stylist,
            }])
        });
    store
        .expect_bookings_for()
        .withf(move |_, _, staff| *staff == [stylist])
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));

    let server = server_with(store, test_config());
    let response = server
        .get("/api/availability/slots")
        .add_query_param("location_id", location_id)
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .add_query_param("staff_ids", format!("any,{}", stylist))
        .add_query_param("selected", "13:30")
        .await;

    response.assert_status_ok();
    let body: SlotsResponse = response.json();
    assert_eq!(
        starts(&body),
        vec![
            ("13:00".to_string(), true),
            ("13:30".to_string(), true),
            ("14:00".to_string(), true),
        ]
    );
    let selected: Vec<bool> = body.slots.iter().map(|slot| slot.is_selected).collect();
    assert_eq!(selected, vec![false, true, false]);
}

#[tokio::test]
async fn staff_booked_at_another_location_is_busy() {
    let location_id = Uuid::new_v4();
    let stylist = Uuid::new_v4();
    let mut store = MockStore::new();
    store.expect_location_hours().never();
    store
        .expect_shifts_for()
        .withf(move |loc, date, staff| *loc == location_id && *date == day() && *staff == [stylist])
        .times(1)
        .returning(move |_, _, _| {
            Ok(vec![ShiftInterval {
                start_time: at("09:00"),
                end_time: at("12:00"),
                employee_id: stylist,
            }])
        });
    // The store returns the stylist's bookings from every location.
    store
        .expect_bookings_for()
        .withf(move |loc, date, staff| *loc == location_id && *date == day() && *staff == [stylist])
        .times(1)
        .returning(move |_, _, _| {
            Ok(vec![BookingInterval {
                start_time: at("10:00"),
                end_time: at("11:00"),
                employee_id: Some(stylist),
            }])
        });

    let server = server_with(store, test_config());
    let response = server
        .get("/api/availability/slots")
        .add_query_param("location_id", location_id)
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .add_query_param("staff_ids", stylist)
        .await;

    response.assert_status_ok();
    let body: SlotsResponse = response.json();
    assert_eq!(
        starts(&body),
        vec![
            ("09:00".to_string(), true),
            ("09:30".to_string(), false),
            ("10:00".to_string(), false),
            ("10:30".to_string(), false),
            ("11:00".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn zero_duration_returns_no_slots_without_fetching() {
    let mut store = MockStore::new();
    store.expect_location_hours().never();
    store.expect_bookings_for().never();

    let server = server_with(store, test_config());
    let response = server
        .get("/api/availability/slots")
        .add_query_param("location_id", Uuid::new_v4())
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 0)
        .await;

    response.assert_status_ok();
    let body: SlotsResponse = response.json();
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn rejects_malformed_queries() {
    let server = server_with(MockStore::new(), test_config());

    let bad_staff = server
        .get("/api/availability/slots")
        .add_query_param("location_id", Uuid::new_v4())
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .add_query_param("staff_ids", "any,not-a-uuid")
        .await;
    bad_staff.assert_status(StatusCode::BAD_REQUEST);

    let bad_time = server
        .get("/api/availability/slots")
        .add_query_param("location_id", Uuid::new_v4())
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .add_query_param("selected", "noon")
        .await;
    bad_time.assert_status(StatusCode::BAD_REQUEST);

    let negative = server
        .get("/api/availability/slots")
        .add_query_param("location_id", Uuid::new_v4())
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", -30)
        .await;
    negative.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = negative.json();
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn failed_fetch_is_retryable() {
    let mut store = MockStore::new();
    store
        .expect_location_hours()
        .returning(|_, _| Ok(Some(open_hours("09:00", "12:00"))));
    store
        .expect_bookings_for()
        .returning(|_, _, _| Err(TimeError::Database(eyre!("connection reset"))));

    let server = server_with(store, test_config());
    let response = server
        .get("/api/availability/slots")
        .add_query_param("location_id", Uuid::new_v4())
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.header("retry-after"), "5");
    let body: Value = response.json();
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn malformed_identity_is_rejected() {
    let server = server_with(MockStore::new(), test_config());

    let response = server
        .get("/api/availability/slots")
        .add_header(
            crate::test_utils::header("x-user-role"),
            crate::test_utils::value("staff"),
        )
        .add_query_param("location_id", Uuid::new_v4())
        .add_query_param("date", "2024-05-15")
        .add_query_param("duration", 60)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
