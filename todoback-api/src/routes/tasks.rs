/// Task endpoints
///
/// - `POST /api/v1/tasks` - Create a task for an existing user
/// - `GET /api/v1/tasks[?id_user=..&id_team=..]` - List tasks
/// - `GET /api/v1/tasks/:id` - Fetch one task
/// - `PATCH /api/v1/tasks/:id` - Change title, priority or team
/// - `DELETE /api/v1/tasks/:id` - Delete a task and its todos

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{created, missing_reference, or_empty, parse_id, resource_location},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use std::collections::HashMap;
use todoback_shared::{
    auth::middleware::AuthContext,
    models::{CreateTaskRequest, Task, TaskFilter, TaskPatch},
    patch::Merge,
};
use uuid::Uuid;
use validator::Validate;

/// Fails with `400` unless the team exists
async fn ensure_team(state: &AppState, team_id: Uuid) -> ApiResult<()> {
    state
        .services
        .teams
        .get_team(team_id)
        .await
        .map_err(|e| missing_reference("team", team_id, e))?;
    Ok(())
}

/// Create a task
///
/// `id_user` defaults to the caller. The owning user, and the team when one
/// is given, must exist; otherwise the request fails with `400` before
/// anything is written.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    req.validate()?;

    let user_id = req.user_id.unwrap_or(auth.user_id);
    state
        .services
        .users
        .get_user(user_id)
        .await
        .map_err(|e| missing_reference("user", user_id, e))?;

    if let Some(team_id) = req.team_id {
        ensure_team(&state, team_id).await?;
    }

    let id = state.services.tasks.create_task(user_id, req).await?;
    Ok(created(resource_location("tasks", id)))
}

/// List tasks, optionally filtered by owner and/or team
///
/// Unknown id-like query keys are rejected; no match is an empty list.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = TaskFilter::from_query(&params)?;

    let tasks = if filter.is_empty() {
        or_empty(state.services.tasks.get_tasks().await)?
    } else {
        or_empty(state.services.tasks.find_tasks_by(&filter).await)?
    };

    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.tasks.get_task(id).await?))
}

/// Partially update a task
///
/// A new `id_team` must reference an existing team.
pub async fn patch_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    patch.validate()?;

    let mut task = state.services.tasks.get_task(id).await?;

    if let Some(&team_id) = patch.team_id.value() {
        ensure_team(&state, team_id).await?;
    }

    patch.merge_into(&mut task);
    state.services.tasks.update_task(&task).await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.tasks.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
