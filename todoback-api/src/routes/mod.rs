/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Register, login and logout
/// - `users`, `tasks`, `todos`, `teams`: Resource CRUD and memberships
///
/// Handlers decode the request, run the cross-entity checks a write needs
/// and call one or more services. The checks are sequential and not wrapped
/// in a transaction, so a concurrent delete between a check and the write
/// that depends on it is not detected.

use crate::{
    app::API_PREFIX,
    error::{ApiError, ApiResult},
};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use todoback_shared::service::{ServiceError, ServiceResult};
use uuid::Uuid;

pub mod auth;
pub mod health;
pub mod tasks;
pub mod teams;
pub mod todos;
pub mod users;

/// Parses a UUID taken from the request path
pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("invalid id {}: {}", raw, e)))
}

/// `201 Created` with a `Location` header and an empty body
pub(crate) fn created(location: String) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
}

/// Location of a resource under the API prefix
pub(crate) fn resource_location(resource: &str, id: Uuid) -> String {
    format!("{}/{}/{}", API_PREFIX, resource, id)
}

/// Turns "referenced entity not found" into a `400` naming the reference
///
/// Any other failure keeps its usual mapping.
pub(crate) fn missing_reference(kind: &str, id: Uuid, err: ServiceError) -> ApiError {
    if err.is_not_found() {
        ApiError::BadRequest(format!("{}[{}] doesn't exist: {}", kind, id, err))
    } else {
        err.into()
    }
}

/// List results with "nothing found" rendered as an empty list
pub(crate) fn or_empty<T>(result: ServiceResult<Vec<T>>) -> ApiResult<Vec<T>> {
    match result {
        Ok(items) => Ok(items),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}
