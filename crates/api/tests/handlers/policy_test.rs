use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use salonsync_api::handlers::policy::PolicyCheckResponse;
use salonsync_db::mock::repositories::MockStore;
use uuid::Uuid;

use crate::test_utils::{as_user, server_with, test_config};

#[tokio::test]
async fn guest_may_read_availability() {
    let server = server_with(MockStore::new(), test_config());

    let response = server
        .get("/api/policy/check")
        .add_query_param("resource", "availability")
        .add_query_param("action", "read")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<PolicyCheckResponse>(),
        PolicyCheckResponse {
            allowed: true,
            reason: None
        }
    );
}

#[rstest]
#[case("customer", "booking", "read", true, true)]
#[case("customer", "booking", "read", false, false)]
#[case("customer", "payroll", "read", true, false)]
#[case("staff", "booking", "delete", false, false)]
#[case("manager", "payroll", "read", false, true)]
#[case("manager", "payroll", "update", false, false)]
#[case("admin", "location_settings", "delete", false, true)]
#[tokio::test]
async fn evaluates_table_for_caller(
    #[case] role: &str,
    #[case] resource: &str,
    #[case] action: &str,
    #[case] owns_record: bool,
    #[case] expected: bool,
) {
    let server = server_with(MockStore::new(), test_config());
    let user_id = Uuid::new_v4();
    let owner_id = if owns_record { user_id } else { Uuid::new_v4() };

    let [id_header, role_header] = as_user(role, user_id);
    let response = server
        .get("/api/policy/check")
        .add_header(id_header.0, id_header.1)
        .add_header(role_header.0, role_header.1)
        .add_query_param("resource", resource)
        .add_query_param("action", action)
        .add_query_param("owner_id", owner_id)
        .await;

    response.assert_status_ok();
    let body: PolicyCheckResponse = response.json();
    assert_eq!(body.allowed, expected);
    assert_eq!(body.reason.is_some(), !expected);
}

#[tokio::test]
async fn denial_names_role_action_and_resource() {
    let server = server_with(MockStore::new(), test_config());

    let response = server
        .get("/api/policy/check")
        .add_query_param("resource", "inventory")
        .add_query_param("action", "update")
        .await;

    let body: PolicyCheckResponse = response.json();
    assert_eq!(body.reason.as_deref(), Some("guest may not update inventory"));
}

#[tokio::test]
async fn unknown_names_are_rejected() {
    let server = server_with(MockStore::new(), test_config());

    let response = server
        .get("/api/policy/check")
        .add_query_param("resource", "spaceship")
        .add_query_param("action", "read")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/policy/check")
        .add_query_param("resource", "booking")
        .add_query_param("action", "archive")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
