//! # Caller Identity Module
//!
//! Sign-in is handled by the hosting platform in front of this service, which
//! forwards the verified caller as two headers:
//!
//! - `X-User-Id`: the caller's user id
//! - `X-User-Role`: one of `guest`, `customer`, `staff`, `manager`, `admin`
//!
//! A request without headers is a guest. A user id without a role is a
//! customer. Every other role must come with a user id.
//!
//! Handlers take a [`CurrentSubject`] argument and call [`authorize`] before
//! touching data, so every permission decision goes through the same table in
//! `salonsync_core::policy`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use salonsync_core::{
    errors::{TimeError, TimeResult},
    policy::{evaluate, Action, Decision, ResourceRef, Role, Subject},
};
use tracing::debug;
use uuid::Uuid;

use super::error_handling::AppError;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor yielding the [`Subject`] making the request
///
/// # Example
///
/// ```no_run
/// use axum::Json;
/// use salonsync_api::middleware::{auth::{authorize, CurrentSubject}, error_handling::AppError};
/// use salonsync_core::policy::{Action, Resource, ResourceRef};
///
/// async fn handler(CurrentSubject(subject): CurrentSubject) -> Result<Json<bool>, AppError> {
///     authorize(&subject, &ResourceRef::new(Resource::Service), Action::Read)?;
///     Ok(Json(true))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSubject(pub Subject);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSubject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentSubject(subject_from_headers(&parts.headers)?))
    }
}

/// Reads the caller from the identity headers
///
/// # Errors
///
/// * `TimeError::Authentication` - malformed user id, unknown role, or a
///   non-guest role without a user id
pub fn subject_from_headers(headers: &HeaderMap) -> TimeResult<Subject> {
    let user_id = match header_str(headers, USER_ID_HEADER)? {
        Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
            TimeError::Authentication(format!("Invalid {} header: {}", USER_ID_HEADER, raw))
        })?),
        None => None,
    };

    let role = match header_str(headers, USER_ROLE_HEADER)? {
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| TimeError::Authentication(format!("Invalid {} header: {}", USER_ROLE_HEADER, e)))?,
        None if user_id.is_some() => Role::Customer,
        None => Role::Guest,
    };

    if role != Role::Guest && user_id.is_none() {
        return Err(TimeError::Authentication(format!(
            "Role {} requires the {} header",
            role, USER_ID_HEADER
        )));
    }

    Ok(Subject { user_id, role })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> TimeResult<Option<&'a str>> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => {
            let value = value.to_str().map_err(|_| {
                TimeError::Authentication(format!("{} header is not valid text", name))
            })?;
            let value = value.trim();
            Ok((!value.is_empty()).then_some(value))
        }
    }
}

/// Fails unless the permission table lets `subject` perform `action`
///
/// Guests are told to sign in (401); signed-in callers are refused (403).
pub fn authorize(subject: &Subject, resource: &ResourceRef, action: Action) -> TimeResult<()> {
    match evaluate(subject, resource, action) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            debug!("Denied: {}", reason);
            if subject.role == Role::Guest {
                Err(TimeError::Authentication(format!("Sign in required: {}", reason)))
            } else {
                Err(TimeError::Authorization(reason))
            }
        }
    }
}
