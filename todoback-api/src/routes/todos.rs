/// Todo endpoints
///
/// Every write checks that the owning task exists, on create and again on
/// update.

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{created, missing_reference, or_empty, parse_id, resource_location},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use todoback_shared::{
    models::{CreateTodoRequest, Todo, TodoPatch},
    patch::Merge,
};
use uuid::Uuid;
use validator::Validate;

async fn ensure_task(state: &AppState, task_id: Uuid) -> ApiResult<()> {
    state
        .services
        .tasks
        .get_task(task_id)
        .await
        .map_err(|e| missing_reference("task", task_id, e))?;
    Ok(())
}

/// Create a todo under an existing task
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    req.validate()?;

    ensure_task(&state, req.task_id).await?;

    let id = state.services.todos.create_todo(req).await?;
    Ok(created(resource_location("todos", id)))
}

pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    Ok(Json(or_empty(state.services.todos.get_todos().await)?))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.todos.get_todo(id).await?))
}

/// Partially update a todo
///
/// The task the merged todo points at must exist, whether or not the patch
/// moved it.
pub async fn patch_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    patch.validate()?;

    let mut todo = state.services.todos.get_todo(id).await?;
    patch.merge_into(&mut todo);

    ensure_task(&state, todo.task_id).await?;
    state.services.todos.update_todo(&todo).await?;

    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.todos.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
