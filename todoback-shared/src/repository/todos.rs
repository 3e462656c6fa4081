//! Todo persistence

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult};
use crate::models::Todo;

#[async_trait]
pub trait TodoReader: Send + Sync {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Todo>;

    async fn select_all(&self) -> RepositoryResult<Vec<Todo>>;
}

#[async_trait]
pub trait TodoWriter: Send + Sync {
    async fn insert(&self, todo: &Todo) -> RepositoryResult<Uuid>;

    async fn update(&self, todo: &Todo) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}

pub trait TodoRepository: TodoReader + TodoWriter {}

impl<T: TodoReader + TodoWriter> TodoRepository for T {}

#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoReader for PgTodoRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Todo> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id_todo AS id, title, text, complete, id_task AS task_id
            FROM todo
            WHERE id_todo = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id_todo AS id, title, text, complete, id_task AS task_id
            FROM todo
            ORDER BY id_task, complete
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }
}

#[async_trait]
impl TodoWriter for PgTodoRepository {
    async fn insert(&self, todo: &Todo) -> RepositoryResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO todo (id_todo, title, text, complete, id_task)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id_todo
            "#,
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.text)
        .bind(todo.complete)
        .bind(todo.task_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, todo: &Todo) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE todo
            SET title = $2, text = $3, complete = $4, id_task = $5
            WHERE id_todo = $1
            "#,
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.text)
        .bind(todo.complete)
        .bind(todo.task_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM todo WHERE id_todo = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// In-memory todo repository
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

#[async_trait]
impl TodoReader for InMemoryTodoRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<Todo> {
        self.todos
            .read()
            .await
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn select_all(&self) -> RepositoryResult<Vec<Todo>> {
        Ok(self.todos.read().await.clone())
    }
}

#[async_trait]
impl TodoWriter for InMemoryTodoRepository {
    async fn insert(&self, todo: &Todo) -> RepositoryResult<Uuid> {
        let mut todos = self.todos.write().await;

        if todos.iter().any(|t| t.id == todo.id) {
            return Err(RepositoryError::AlreadyExists);
        }

        todos.push(todo.clone());
        Ok(todo.id)
    }

    async fn update(&self, todo: &Todo) -> RepositoryResult<()> {
        let mut todos = self.todos.write().await;

        let stored = todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = todo.clone();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut todos = self.todos.write().await;
        let before = todos.len();

        todos.retain(|t| t.id != id);

        if todos.len() == before {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
