/// Multi-step deletes are not transactional
///
/// Deleting a team removes its memberships before the team row. When the
/// final step fails, the memberships stay deleted while the team survives.
/// These tests pin that behaviour down so a change to it is deliberate.

mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use std::sync::Arc;
use todoback_shared::{
    models::Team,
    repository::{
        teams::{TeamReader, TeamWriter},
        InMemoryTeamRepository, RepositoryError, RepositoryResult, Repositories,
    },
};
use uuid::Uuid;

/// Team store whose deletes always fail
#[derive(Default)]
struct UndeletableTeams {
    inner: InMemoryTeamRepository,
}

#[async_trait]
impl TeamReader for UndeletableTeams {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Team> {
        self.inner.select_by_id(id).await
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Team>> {
        self.inner.select_all().await
    }
}

#[async_trait]
impl TeamWriter for UndeletableTeams {
    async fn insert(&self, team: &Team) -> RepositoryResult<Uuid> {
        self.inner.insert(team).await
    }

    async fn update(&self, team: &Team) -> RepositoryResult<()> {
        self.inner.update(team).await
    }

    async fn delete(&self, _id: Uuid) -> RepositoryResult<()> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn test_failed_team_delete_leaves_memberships_removed() {
    let mut repositories = Repositories::in_memory();
    repositories.teams = Arc::new(UndeletableTeams::default());
    let ctx = TestContext::with_repositories(repositories);

    let (alice, cookie) = ctx.signed_in_user("alice").await;
    let team = ctx
        .post("/api/v1/teams", &cookie, json!({ "name": "core" }))
        .await
        .location_id();
    let task = ctx
        .post("/api/v1/tasks", &cookie, json!({ "title": "shared", "id_team": team }))
        .await
        .location_id();
    ctx.put(&format!("/api/v1/teams/{}/users/{}", team, alice), &cookie).await;

    let response = ctx.delete(&format!("/api/v1/teams/{}", team), &cookie).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "internal server error");

    // Team still there
    assert_eq!(
        ctx.get(&format!("/api/v1/teams/{}", team), &cookie).await.status,
        StatusCode::OK
    );

    // Earlier steps were not rolled back
    assert_eq!(
        ctx.get(&format!("/api/v1/teams/{}/users", team), &cookie).await.text(),
        "[]"
    );
    assert_eq!(
        ctx.get(&format!("/api/v1/tasks/{}", task), &cookie).await.status,
        StatusCode::NOT_FOUND
    );
}
