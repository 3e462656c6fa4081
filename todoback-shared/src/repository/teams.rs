//! Team persistence

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult};
use crate::models::Team;

#[async_trait]
pub trait TeamReader: Send + Sync {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Team>;

    async fn select_all(&self) -> RepositoryResult<Vec<Team>>;
}

#[async_trait]
pub trait TeamWriter: Send + Sync {
    async fn insert(&self, team: &Team) -> RepositoryResult<Uuid>;

    async fn update(&self, team: &Team) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}

pub trait TeamRepository: TeamReader + TeamWriter {}

impl<T: TeamReader + TeamWriter> TeamRepository for T {}

#[derive(Debug, Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamReader for PgTeamRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Team> {
        sqlx::query_as::<_, Team>("SELECT id_team AS id, name FROM team WHERE id_team = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>("SELECT id_team AS id, name FROM team ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(teams)
    }
}

#[async_trait]
impl TeamWriter for PgTeamRepository {
    async fn insert(&self, team: &Team) -> RepositoryResult<Uuid> {
        let (id,): (Uuid,) =
            sqlx::query_as("INSERT INTO team (id_team, name) VALUES ($1, $2) RETURNING id_team")
                .bind(team.id)
                .bind(&team.name)
                .fetch_one(&self.pool)
                .await?;

        Ok(id)
    }

    async fn update(&self, team: &Team) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE team SET name = $2 WHERE id_team = $1")
            .bind(team.id)
            .bind(&team.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM team WHERE id_team = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// In-memory team repository
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<Vec<Team>>,
}

#[async_trait]
impl TeamReader for InMemoryTeamRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Team> {
        self.teams
            .read()
            .await
            .iter()
            .find(|team| team.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Team>> {
        Ok(self.teams.read().await.clone())
    }
}

#[async_trait]
impl TeamWriter for InMemoryTeamRepository {
    async fn insert(&self, team: &Team) -> RepositoryResult<Uuid> {
        let mut teams = self.teams.write().await;

        if teams.iter().any(|t| t.id == team.id) {
            return Err(RepositoryError::AlreadyExists);
        }

        teams.push(team.clone());
        Ok(team.id)
    }

    async fn update(&self, team: &Team) -> RepositoryResult<()> {
        let mut teams = self.teams.write().await;

        let stored = teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = team.clone();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut teams = self.teams.write().await;
        let before = teams.len();

        teams.retain(|t| t.id != id);

        if teams.len() == before {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
