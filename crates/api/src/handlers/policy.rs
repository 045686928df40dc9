//! # Policy Handlers
//!
//! Lets a client ask whether the current caller may perform an action, so
//! screens can hide what the user cannot do. The same table is enforced
//! server side by every handler through `authorize`.

use axum::{extract::Query, Json};
use salonsync_core::{
    errors::TimeError,
    policy::{evaluate, Action, Decision, Resource, ResourceRef},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{auth::CurrentSubject, error_handling::AppError};

/// Query parameters for the permission check endpoint
#[derive(Debug, Deserialize)]
pub struct PolicyQuery {
    /// Resource name such as `booking` or `loyalty_wallet`
    pub resource: String,
    /// One of `read`, `create`, `update`, `delete`
    pub action: String,
    /// Customer or staff member the record belongs to
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCheckResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Evaluates the permission table for the caller
///
/// A denial is a normal answer here, not an error.
pub async fn check_permission(
    CurrentSubject(subject): CurrentSubject,
    Query(query): Query<PolicyQuery>,
) -> Result<Json<PolicyCheckResponse>, AppError> {
    let kind: Resource = query.resource.parse().map_err(TimeError::Validation)?;
    let action: Action = query.action.parse().map_err(TimeError::Validation)?;

    let resource = match query.owner_id {
        Some(owner_id) => ResourceRef::owned_by(kind, owner_id),
        None => ResourceRef::new(kind),
    };

    let response = match evaluate(&subject, &resource, action) {
        Decision::Allow => PolicyCheckResponse {
            allowed: true,
            reason: None,
        },
        Decision::Deny(reason) => PolicyCheckResponse {
            allowed: false,
            reason: Some(reason),
        },
    };

    Ok(Json(response))
}
