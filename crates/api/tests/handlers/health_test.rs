use pretty_assertions::assert_eq;
use salonsync_db::mock::repositories::MockStore;
use serde_json::{json, Value};

use crate::test_utils::{cached_server_with, server_with, test_config};

#[tokio::test]
async fn health_reports_change_listeners() {
    let plain = server_with(MockStore::new(), test_config());
    let response = plain.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "ok", "change_listeners": 0 }));

    let cached = cached_server_with(MockStore::new(), test_config());
    let body: Value = cached.get("/health").await.json();
    assert_eq!(body["change_listeners"], 1);
}

#[tokio::test]
async fn version_matches_crate() {
    let server = server_with(MockStore::new(), test_config());
    let body: Value = server.get("/version").await.json();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
