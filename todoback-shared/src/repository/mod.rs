//! Storage access, one repository per entity family
//!
//! Every family is split into a `*Reader` and a `*Writer` trait. Both have
//! two implementations: a PostgreSQL one built on a shared [`PgPool`], and an
//! in-memory one used by tests and local runs without a database. The
//! in-memory stores mirror the unique constraints of the schema but do not
//! emulate foreign keys or `ON DELETE CASCADE`.
//!
//! Repositories translate "no rows" into [`RepositoryError::NotFound`] and a
//! unique-constraint violation into [`RepositoryError::AlreadyExists`]; every
//! other store error is passed through unchanged.

use std::sync::Arc;

use sqlx::PgPool;

pub mod relations;
pub mod tasks;
pub mod teams;
pub mod todos;
pub mod users;

pub use relations::{InMemoryRelationRepository, PgRelationRepository, RelationRepository};
pub use tasks::{InMemoryTaskRepository, PgTaskRepository, TaskRepository};
pub use teams::{InMemoryTeamRepository, PgTeamRepository, TeamRepository};
pub use todos::{InMemoryTodoRepository, PgTodoRepository, TodoRepository};
pub use users::{InMemoryUserRepository, PgUserRepository, UserRepository};

/// Repository error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No matching row
    #[error("entities not found")]
    NotFound,

    /// Unique-constraint violation
    #[error("entity already exists in repo")]
    AlreadyExists,

    /// Any other store failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::AlreadyExists
            }
            other => RepositoryError::Database(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// One repository per entity family, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub todos: Arc<dyn TodoRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub relations: Arc<dyn RelationRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool.clone())),
            todos: Arc::new(PgTodoRepository::new(pool.clone())),
            teams: Arc::new(PgTeamRepository::new(pool.clone())),
            relations: Arc::new(PgRelationRepository::new(pool)),
        }
    }

    /// Empty in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            tasks: Arc::new(InMemoryTaskRepository::default()),
            todos: Arc::new(InMemoryTodoRepository::default()),
            teams: Arc::new(InMemoryTeamRepository::default()),
            relations: Arc::new(InMemoryRelationRepository::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::PoolTimedOut)));
    }
}
