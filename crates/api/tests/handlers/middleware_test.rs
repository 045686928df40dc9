use axum::http::StatusCode;
use eyre::eyre;
use salonsync_api::middleware::error_handling::{map_error, AppError};
use salonsync_core::errors::TimeError;

#[test]
fn test_map_error_not_found() {
    let response = map_error(TimeError::NotFound("Booking not found".to_string()));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_map_error_validation() {
    let response = map_error(TimeError::Validation("Invalid input".to_string()));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_map_error_authentication() {
    let response = map_error(TimeError::Authentication("Sign in required".to_string()));
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_map_error_authorization() {
    let response = map_error(TimeError::Authorization("Not allowed".to_string()));
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[test]
fn test_map_error_unavailable_sets_retry_after() {
    let response = map_error(TimeError::Unavailable("Could not load bookings".to_string()));
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()["retry-after"], "5");
}

#[test]
fn test_map_error_database() {
    let response = map_error(TimeError::Database(eyre!("Connection refused")));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("retry-after").is_none());
}

#[test]
fn test_map_error_internal() {
    let error = std::io::Error::other("Something went wrong");
    let response = map_error(TimeError::Internal(Box::new(error)));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_eyre_report_maps_to_database_error() {
    let error: AppError = eyre!("pool timed out").into();
    assert!(matches!(error.0, TimeError::Database(_)));
}
