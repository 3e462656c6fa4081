/// User endpoints
///
/// - `POST /api/v1/users` - Create a user (public)
/// - `GET /api/v1/users[?email=..|?login=..]` - List or look up users
/// - `GET /api/v1/users/:id` - Fetch one user
/// - `PATCH /api/v1/users/:id` - Partial update
/// - `DELETE /api/v1/users/:id` - Delete a user with its memberships and tasks
/// - `OPTIONS /api/v1/users/:id` - Methods allowed on a user
/// - `GET /api/v1/users/:id/teams` - Teams the user belongs to

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{created, or_empty, parse_id, resource_location},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use todoback_shared::{
    auth::password::validate_password_strength,
    models::{CreateUserRequest, User, UserListQuery, UserPatch, UserTeamRelation},
};
use uuid::Uuid;
use validator::Validate;

const USER_ALLOWED_METHODS: &str = "GET, DELETE, PATCH, OPTIONS";

/// Validates a new account and stores it
///
/// Shared by `POST /users` and `POST /auth/register`.
pub(crate) async fn register_user(state: &AppState, req: CreateUserRequest) -> ApiResult<Uuid> {
    req.validate()?;
    validate_password_strength(&req.password).map_err(ApiError::BadRequest)?;

    if state.services.users.email_taken(&req.email).await? {
        return Err(ApiError::Conflict(format!(
            "user with email {} already exists",
            req.email
        )));
    }

    Ok(state.services.users.create_user(req).await?)
}

/// Create a user
///
/// Answers `201 Created` with `Location: /api/v1/users/{id}`.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    let id = register_user(&state, req).await?;

    Ok(created(resource_location("users", id)))
}

/// List users, optionally filtered by exact email or login
///
/// No match is an empty list, not an error.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let users = match query.filter() {
        Some(filter) => or_empty(state.services.users.find_users_by(&filter).await)?,
        None => or_empty(state.services.users.get_users().await)?,
    };

    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.users.get_user(id).await?))
}

/// Methods served on `/users/:id`
pub async fn user_options() -> (StatusCode, [(header::HeaderName, &'static str); 1]) {
    (StatusCode::OK, [(header::ALLOW, USER_ALLOWED_METHODS)])
}

/// Partially update a user
///
/// Omitted fields stay as they are; `image_id: null` clears the image. A new
/// password must pass the strength rules and is hashed before storage; a new
/// email must not belong to another user.
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    patch.validate()?;
    if let Some(password) = &patch.password {
        validate_password_strength(password).map_err(ApiError::BadRequest)?;
    }

    let current = state.services.users.get_user(id).await?;
    if let Some(email) = &patch.email {
        if *email != current.email && state.services.users.email_taken(email).await? {
            return Err(ApiError::Conflict(format!(
                "user with email {} already exists",
                email
            )));
        }
    }

    let user = state.services.users.patch_user(id, patch).await?;
    Ok(Json(user))
}

/// Delete a user
///
/// Removes the user's team memberships, then the tasks it owns, then the
/// user. The steps are not transactional.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.users.get_user(id).await?;

    let relations = state.services.relations.delete_relations_by_user_id(id).await?;
    let tasks = state.services.tasks.delete_tasks_by_user_id(id).await?;
    state.services.users.delete_user(id).await?;

    tracing::info!(user_id = %id, relations, tasks, "Deleted user with dependents");
    Ok(StatusCode::NO_CONTENT)
}

/// Teams the user is a member of
pub async fn list_user_teams(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<UserTeamRelation>>> {
    let id = parse_id(&id)?;
    state.services.users.get_user(id).await?;

    let relations = or_empty(state.services.relations.get_relations_by_user_id(id).await)?;
    Ok(Json(relations))
}
