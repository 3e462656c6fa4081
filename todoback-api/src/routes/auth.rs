/// Authentication endpoints
///
/// This module provides session endpoints:
/// - Registration
/// - Login (sets the session cookie)
/// - Logout (clears the session cookie)
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Register new user
/// - `POST /api/v1/auth/login` - Check credentials and start a session
/// - `GET /api/v1/auth/logout` - End the session

use crate::{
    app::{AppState, API_PREFIX},
    error::{ApiError, ApiResult},
    routes::{created, users::register_user},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use todoback_shared::{
    auth::{
        jwt::{create_token, Claims},
        middleware::{removal_cookie, session_cookie, SESSION_COOKIE},
    },
    models::{CreateUserRequest, LoginRequest},
};
use validator::Validate;

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/register
/// Content-Type: application/json
///
/// {
///   "login": "alice",
///   "email": "alice@x.io",
///   "password": "p@ssW0rd1"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `Location: /api/v1/auth/login` and an empty body.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, invalid email or weak password
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;

    register_user(&state, req).await?;

    Ok(created(format!("{}/auth/login", API_PREFIX)))
}

/// Login with email and password
///
/// On success the response carries a `session_id` cookie holding a signed
/// token valid for 24 hours.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, StatusCode)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .services
        .users
        .verify_credentials(&req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::debug!(email = %req.email, "Login failed");
            ApiError::from(e)
        })?;

    let token = create_token(&Claims::new(user.id), state.jwt_secret())?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok((jar.add(session_cookie(token)), StatusCode::OK))
}

/// Logout
///
/// Replaces the session cookie with an expired, empty one. Without a session
/// cookie there is nothing to end and the request is rejected with `401`.
pub async fn logout(jar: CookieJar) -> ApiResult<(CookieJar, StatusCode)> {
    if jar.get(SESSION_COOKIE).is_none() {
        return Err(ApiError::Unauthorized("missing session cookie".to_string()));
    }

    Ok((jar.add(removal_cookie()), StatusCode::OK))
}
