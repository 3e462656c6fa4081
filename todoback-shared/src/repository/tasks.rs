//! Task persistence

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult};
use crate::models::{Task, TaskFilter};

#[async_trait]
pub trait TaskReader: Send + Sync {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Task>;

    /// Tasks matching every set column of the filter
    async fn select_by(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>>;

    async fn select_all(&self) -> RepositoryResult<Vec<Task>>;
}

#[async_trait]
pub trait TaskWriter: Send + Sync {
    async fn insert(&self, task: &Task) -> RepositoryResult<Uuid>;

    async fn update(&self, task: &Task) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    /// Deletes every task owned by the user, returning how many went
    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<u64>;

    /// Deletes every task shared with the team, returning how many went
    async fn delete_by_team_id(&self, team_id: Uuid) -> RepositoryResult<u64>;
}

pub trait TaskRepository: TaskReader + TaskWriter {}

impl<T: TaskReader + TaskWriter> TaskRepository for T {}

#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskReader for PgTaskRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id_task AS id, title, priority, id_user AS user_id, id_team AS team_id
            FROM task
            WHERE id_task = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn select_by(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id_task AS id, title, priority, id_user AS user_id, id_team AS team_id FROM task",
        );

        let mut separator = " WHERE ";
        if let Some(user_id) = filter.user_id {
            query.push(separator).push("id_user = ").push_bind(user_id);
            separator = " AND ";
        }
        if let Some(team_id) = filter.team_id {
            query.push(separator).push("id_team = ").push_bind(team_id);
        }
        query.push(" ORDER BY priority DESC NULLS LAST, title");

        let tasks = query.build_query_as::<Task>().fetch_all(&self.pool).await?;

        Ok(tasks)
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Task>> {
        self.select_by(&TaskFilter::default()).await
    }
}

#[async_trait]
impl TaskWriter for PgTaskRepository {
    async fn insert(&self, task: &Task) -> RepositoryResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO task (id_task, title, priority, id_user, id_team)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id_task
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(task.priority)
        .bind(task.user_id)
        .bind(task.team_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE task
            SET title = $2, priority = $3, id_team = $4
            WHERE id_task = $1
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(task.priority)
        .bind(task.team_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM task WHERE id_task = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM task WHERE id_user = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_team_id(&self, team_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM task WHERE id_team = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// In-memory task repository
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    async fn delete_where(&self, predicate: impl Fn(&Task) -> bool + Send) -> u64 {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();

        tasks.retain(|task| !predicate(task));

        (before - tasks.len()) as u64
    }
}

#[async_trait]
impl TaskReader for InMemoryTaskRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn select_by(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }
}

#[async_trait]
impl TaskWriter for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> RepositoryResult<Uuid> {
        let mut tasks = self.tasks.write().await;

        if tasks.iter().any(|t| t.id == task.id) {
            return Err(RepositoryError::AlreadyExists);
        }

        tasks.push(task.clone());
        Ok(task.id)
    }

    async fn update(&self, task: &Task) -> RepositoryResult<()> {
        let mut tasks = self.tasks.write().await;

        let stored = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = task.clone();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        match self.delete_where(|task| task.id == id).await {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<u64> {
        Ok(self.delete_where(|task| task.user_id == user_id).await)
    }

    async fn delete_by_team_id(&self, team_id: Uuid) -> RepositoryResult<u64> {
        Ok(self.delete_where(|task| task.team_id == Some(team_id)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(user_id: Uuid, team_id: Option<Uuid>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "task".to_string(),
            priority: None,
            user_id,
            team_id,
        }
    }

    #[tokio::test]
    async fn test_filter_by_user_and_team() {
        let repo = InMemoryTaskRepository::default();
        let (alice, bob, team) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        repo.insert(&task(alice, Some(team))).await.unwrap();
        repo.insert(&task(alice, None)).await.unwrap();
        repo.insert(&task(bob, Some(team))).await.unwrap();

        assert_eq!(repo.select_by(&TaskFilter::by_user(alice)).await.unwrap().len(), 2);
        assert_eq!(repo.select_by(&TaskFilter::by_team(team)).await.unwrap().len(), 2);

        let both = TaskFilter {
            user_id: Some(bob),
            team_id: Some(team),
        };
        assert_eq!(repo.select_by(&both).await.unwrap().len(), 1);
        assert_eq!(repo.select_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_deletes() {
        let repo = InMemoryTaskRepository::default();
        let (alice, team) = (Uuid::new_v4(), Uuid::new_v4());

        repo.insert(&task(alice, Some(team))).await.unwrap();
        repo.insert(&task(alice, None)).await.unwrap();
        repo.insert(&task(Uuid::new_v4(), Some(team))).await.unwrap();

        assert_eq!(repo.delete_by_team_id(team).await.unwrap(), 2);
        assert_eq!(repo.delete_by_user_id(alice).await.unwrap(), 1);
        assert_eq!(repo.delete_by_team_id(team).await.unwrap(), 0);
        assert!(repo.select_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_task() {
        let repo = InMemoryTaskRepository::default();
        assert!(repo.delete(Uuid::new_v4()).await.unwrap_err().is_not_found());
    }
}
