//! User-team membership persistence
//!
//! Relations are keyed by the `(user, team)` pair; there is no separate ID.

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult};
use crate::models::UserTeamRelation;

#[async_trait]
pub trait RelationReader: Send + Sync {
    async fn select_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Vec<UserTeamRelation>>;

    async fn select_by_team_id(&self, team_id: Uuid) -> RepositoryResult<Vec<UserTeamRelation>>;

    async fn select_by_ids(&self, user_id: Uuid, team_id: Uuid) -> RepositoryResult<UserTeamRelation>;
}

#[async_trait]
pub trait RelationWriter: Send + Sync {
    async fn insert(&self, relation: &UserTeamRelation) -> RepositoryResult<()>;

    /// Deletes one membership; NotFound if the pair is not stored
    async fn delete_by_ids(&self, user_id: Uuid, team_id: Uuid) -> RepositoryResult<()>;

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<u64>;

    async fn delete_by_team_id(&self, team_id: Uuid) -> RepositoryResult<u64>;
}

pub trait RelationRepository: RelationReader + RelationWriter {}

impl<T: RelationReader + RelationWriter> RelationRepository for T {}

#[derive(Debug, Clone)]
pub struct PgRelationRepository {
    pool: PgPool,
}

impl PgRelationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationReader for PgRelationRepository {
    async fn select_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Vec<UserTeamRelation>> {
        let relations = sqlx::query_as::<_, UserTeamRelation>(
            "SELECT id_user AS user_id, id_team AS team_id FROM users_team_xref WHERE id_user = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(relations)
    }

    async fn select_by_team_id(&self, team_id: Uuid) -> RepositoryResult<Vec<UserTeamRelation>> {
        let relations = sqlx::query_as::<_, UserTeamRelation>(
            "SELECT id_user AS user_id, id_team AS team_id FROM users_team_xref WHERE id_team = $1",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(relations)
    }

    async fn select_by_ids(&self, user_id: Uuid, team_id: Uuid) -> RepositoryResult<UserTeamRelation> {
        sqlx::query_as::<_, UserTeamRelation>(
            r#"
            SELECT id_user AS user_id, id_team AS team_id
            FROM users_team_xref
            WHERE id_user = $1 AND id_team = $2
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl RelationWriter for PgRelationRepository {
    async fn insert(&self, relation: &UserTeamRelation) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO users_team_xref (id_user, id_team) VALUES ($1, $2)")
            .bind(relation.user_id)
            .bind(relation.team_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_by_ids(&self, user_id: Uuid, team_id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users_team_xref WHERE id_user = $1 AND id_team = $2")
            .bind(user_id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM users_team_xref WHERE id_user = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_team_id(&self, team_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM users_team_xref WHERE id_team = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// In-memory relation repository
#[derive(Debug, Default)]
pub struct InMemoryRelationRepository {
    relations: RwLock<Vec<UserTeamRelation>>,
}

impl InMemoryRelationRepository {
    async fn select_where(&self, predicate: impl Fn(&UserTeamRelation) -> bool + Send) -> Vec<UserTeamRelation> {
        self.relations
            .read()
            .await
            .iter()
            .filter(|&relation| predicate(relation))
            .copied()
            .collect()
    }

    async fn delete_where(&self, predicate: impl Fn(&UserTeamRelation) -> bool + Send) -> u64 {
        let mut relations = self.relations.write().await;
        let before = relations.len();

        relations.retain(|relation| !predicate(relation));

        (before - relations.len()) as u64
    }
}

#[async_trait]
impl RelationReader for InMemoryRelationRepository {
    async fn select_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Vec<UserTeamRelation>> {
        Ok(self.select_where(|r| r.user_id == user_id).await)
    }

    async fn select_by_team_id(&self, team_id: Uuid) -> RepositoryResult<Vec<UserTeamRelation>> {
        Ok(self.select_where(|r| r.team_id == team_id).await)
    }

    async fn select_by_ids(&self, user_id: Uuid, team_id: Uuid) -> RepositoryResult<UserTeamRelation> {
        self.select_where(|r| r.user_id == user_id && r.team_id == team_id)
            .await
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl RelationWriter for InMemoryRelationRepository {
    async fn insert(&self, relation: &UserTeamRelation) -> RepositoryResult<()> {
        let mut relations = self.relations.write().await;

        if relations.contains(relation) {
            return Err(RepositoryError::AlreadyExists);
        }

        relations.push(*relation);
        Ok(())
    }

    async fn delete_by_ids(&self, user_id: Uuid, team_id: Uuid) -> RepositoryResult<()> {
        match self
            .delete_where(|r| r.user_id == user_id && r.team_id == team_id)
            .await
        {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<u64> {
        Ok(self.delete_where(|r| r.user_id == user_id).await)
    }

    async fn delete_by_team_id(&self, team_id: Uuid) -> RepositoryResult<u64> {
        Ok(self.delete_where(|r| r.team_id == team_id).await)
    }
}
