//! User persistence

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult};
use crate::models::{User, UserFilter};

#[async_trait]
pub trait UserReader: Send + Sync {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<User>;

    async fn select_by_email(&self, email: &str) -> RepositoryResult<User>;

    /// Every user matching the filter, possibly none
    async fn select_by(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>>;

    async fn select_all(&self) -> RepositoryResult<Vec<User>>;
}

#[async_trait]
pub trait UserWriter: Send + Sync {
    /// Inserts the user and returns its ID
    async fn insert(&self, user: &User) -> RepositoryResult<Uuid>;

    /// Replaces the stored row with `user`
    async fn update(&self, user: &User) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}

pub trait UserRepository: UserReader + UserWriter {}

impl<T: UserReader + UserWriter> UserRepository for T {}

/// PostgreSQL-backed user repository
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserReader for PgUserRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id_user AS id, login, email, password AS password_hash,
                   created_at, id_image AS image_id
            FROM users
            WHERE id_user = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn select_by_email(&self, email: &str) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id_user AS id, login, email, password AS password_hash,
                   created_at, id_image AS image_id
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn select_by(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>> {
        // Column names come from a closed enum, never from user input
        let sql = format!(
            r#"
            SELECT id_user AS id, login, email, password AS password_hash,
                   created_at, id_image AS image_id
            FROM users
            WHERE {} = $1
            ORDER BY created_at
            "#,
            filter.column()
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(filter.value())
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn select_all(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id_user AS id, login, email, password AS password_hash,
                   created_at, id_image AS image_id
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[async_trait]
impl UserWriter for PgUserRepository {
    async fn insert(&self, user: &User) -> RepositoryResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO users (id_user, login, email, password, created_at, id_image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id_user
            "#,
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.image_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET login = $2, email = $3, password = $4, id_image = $5
            WHERE id_user = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.image_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id_user = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// In-memory user repository
///
/// Keeps insertion order and enforces unique IDs and emails.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserReader for InMemoryUserRepository {
    async fn select_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn select_by_email(&self, email: &str) -> RepositoryResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn select_by(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }

    async fn select_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }
}

#[async_trait]
impl UserWriter for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> RepositoryResult<Uuid> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.id == user.id || u.email == user.email) {
            return Err(RepositoryError::AlreadyExists);
        }

        users.push(user.clone());
        Ok(user.id)
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.id != user.id && u.email == user.email) {
            return Err(RepositoryError::AlreadyExists);
        }

        let stored = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = user.clone();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();

        users.retain(|u| u.id != id);

        if users.len() == before {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
