/// Team and membership endpoints
///
/// - `POST|GET /api/v1/teams`
/// - `GET|PATCH|DELETE /api/v1/teams/:id`
/// - `GET /api/v1/teams/:id/users` - Members of a team
/// - `PUT|DELETE /api/v1/teams/:team_id/users/:user_id` - Add or remove a member
///
/// Deleting a team first removes its memberships, then its tasks, then the
/// team row. These are separate statements; if a later one fails the earlier
/// ones stay applied.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{created, or_empty, parse_id, resource_location},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use todoback_shared::{
    models::{CreateTeamRequest, Team, TeamPatch, UserTeamRelation},
    patch::Merge,
};
use validator::Validate;

pub async fn create_team(
    State(state): State<AppState>,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    req.validate()?;

    let id = state.services.teams.create_team(req).await?;
    Ok(created(resource_location("teams", id)))
}

pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(or_empty(state.services.teams.get_teams().await)?))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Team>> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.teams.get_team(id).await?))
}

pub async fn patch_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TeamPatch>, JsonRejection>,
) -> ApiResult<Json<Team>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    patch.validate()?;

    let mut team = state.services.teams.get_team(id).await?;
    patch.merge_into(&mut team);
    state.services.teams.update_team(&team).await?;

    Ok(Json(team))
}

/// Delete a team with its memberships and tasks
///
/// A team without members is deleted directly.
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.teams.get_team(id).await?;

    let relations = state.services.relations.delete_relations_by_team_id(id).await?;
    let tasks = state.services.tasks.delete_tasks_by_team_id(id).await?;
    state.services.teams.delete_team(id).await?;

    tracing::info!(team_id = %id, relations, tasks, "Deleted team with dependents");
    Ok(StatusCode::NO_CONTENT)
}

/// Members of a team
pub async fn list_team_users(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<UserTeamRelation>>> {
    let id = parse_id(&id)?;
    state.services.teams.get_team(id).await?;

    let relations = or_empty(state.services.relations.get_relations_by_team_id(id).await)?;
    Ok(Json(relations))
}

/// Add a user to a team
///
/// Both must exist (`404` otherwise); an existing membership is `409`.
/// The insert still reports a duplicate that slipped past the lookup.
pub async fn add_team_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let team_id = parse_id(&team_id)?;
    let user_id = parse_id(&user_id)?;

    state.services.teams.get_team(team_id).await?;
    state.services.users.get_user(user_id).await?;

    match state.services.relations.get_relation(user_id, team_id).await {
        Ok(_) => {
            return Err(ApiError::Conflict(format!(
                "user {} is already a member of team {}",
                user_id, team_id
            )))
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    state.services.relations.add_member(user_id, team_id).await?;
    Ok(StatusCode::CREATED)
}

/// Remove a user from a team
pub async fn remove_team_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let team_id = parse_id(&team_id)?;
    let user_id = parse_id(&user_id)?;

    state.services.relations.delete_relation(user_id, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
