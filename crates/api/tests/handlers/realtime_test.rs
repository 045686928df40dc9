use axum::http::StatusCode;
use chrono::NaiveDateTime;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use salonsync_api::{config::ApiConfig, handlers::realtime::ChangeAck};
use salonsync_core::{
    events::{ChangeEvent, ChangeKind, Table},
    models::{availability::SlotsResponse, hours::BookingInterval},
};
use salonsync_db::mock::repositories::MockStore;
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use uuid::Uuid;

use crate::test_utils::{cached_server_with, day, header, open_hours, server_with, t, test_config, value};

fn at(raw: &str) -> NaiveDateTime {
    day().and_time(t(raw))
}

#[tokio::test]
async fn booking_change_refreshes_cached_slots() {
    let location_id = Uuid::new_v4();
    let booking_fetches = Arc::new(AtomicUsize::new(0));

    let mut store = MockStore::new();
    // Hours are not touched by a booking change, so they are fetched once.
    store
        .expect_location_hours()
        .with(eq(location_id), eq(3u8))
        .times(1)
        .returning(|_, _| Ok(Some(open_hours("09:00", "11:00"))));
    let fetches = booking_fetches.clone();
    store.expect_bookings_for().times(2).returning(move |_, _, _| {
        // The second read sees the booking written between the requests.
        if fetches.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(Vec::new())
        } else {
            Ok(vec![BookingInterval {
                start_time: at("09:00"),
                end_time: at("10:00"),
                employee_id: None,
            }])
        }
    });

    let server = cached_server_with(store, test_config());
    let slots = || {
        server
            .get("/api/availability/slots")
            .add_query_param("location_id", location_id)
            .add_query_param("date", "2024-05-15")
            .add_query_param("duration", 60)
    };

    let first: SlotsResponse = slots().await.json();
    let cached: SlotsResponse = slots().await.json();
    assert_eq!(booking_fetches.load(Ordering::SeqCst), 1);
    assert!(first.slots.iter().all(|slot| slot.is_available));
    assert!(cached.slots.iter().all(|slot| slot.is_available));

    let event = ChangeEvent::new(Table::Bookings, ChangeKind::Insert)
        .on_date(day())
        .at_location(location_id);
    let ack = server.post("/api/realtime/changes").json(&event).await;
    ack.assert_status(StatusCode::ACCEPTED);
    assert_eq!(ack.json::<ChangeAck>(), ChangeAck { delivered_to: 1 });

    let refreshed: SlotsResponse = slots().await.json();
    assert_eq!(booking_fetches.load(Ordering::SeqCst), 2);
    let available: Vec<bool> = refreshed.slots.iter().map(|slot| slot.is_available).collect();
    assert_eq!(available, vec![false, false, true]);
}

#[tokio::test]
async fn secret_is_enforced_when_configured() {
    let config = ApiConfig {
        realtime_webhook_secret: Some("s3cret".to_string()),
        ..test_config()
    };
    let server = server_with(MockStore::new(), config);
    let event = json!({ "table": "staff_shifts", "kind": "update", "date": "2024-05-15" });

    let missing = server.post("/api/realtime/changes").json(&event).await;
    missing.assert_status(StatusCode::UNAUTHORIZED);

    let wrong = server
        .post("/api/realtime/changes")
        .add_header(header("x-realtime-secret"), value("guess"))
        .json(&event)
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    let same_length = server
        .post("/api/realtime/changes")
        .add_header(header("x-realtime-secret"), value("s3creT"))
        .json(&event)
        .await;
    same_length.assert_status(StatusCode::UNAUTHORIZED);

    let accepted = server
        .post("/api/realtime/changes")
        .add_header(header("x-realtime-secret"), value("s3cret"))
        .json(&event)
        .await;
    accepted.assert_status(StatusCode::ACCEPTED);
    assert_eq!(accepted.json::<ChangeAck>(), ChangeAck { delivered_to: 0 });
}
