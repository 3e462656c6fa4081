//! User use cases

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{non_empty, ServiceError, ServiceResult};
use crate::auth::password::{hash_password, verify_dummy_password, verify_password};
use crate::models::{CreateUserRequest, User, UserFilter, UserPatch};
use crate::patch::Merge;
use crate::repository::{RepositoryError, UserRepository};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Hashes the password, assigns an ID and stores the user
    ///
    /// The caller is expected to have checked that the email is free; a
    /// collision still surfaces as `AlreadyExists` from the store.
    pub async fn create_user(&self, req: CreateUserRequest) -> ServiceResult<Uuid> {
        let user = User {
            id: Uuid::new_v4(),
            login: req.login,
            email: req.email,
            password_hash: hash_password(&req.password)?,
            created_at: Utc::now(),
            image_id: None,
        };

        let id = self.repo.insert(&user).await?;
        info!(user_id = %id, "Created user");

        Ok(id)
    }

    pub async fn get_user(&self, id: Uuid) -> ServiceResult<User> {
        Ok(self.repo.select_by_id(id).await?)
    }

    pub async fn get_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.repo.select_all().await?)
    }

    /// Users matching the filter; NotFound when there are none
    pub async fn find_users_by(&self, filter: &UserFilter) -> ServiceResult<Vec<User>> {
        non_empty(self.repo.select_by(filter).await?)
    }

    /// Exactly one user matching the filter
    pub async fn find_one_user_by(&self, filter: &UserFilter) -> ServiceResult<User> {
        let mut users = self.find_users_by(filter).await?;

        if users.len() > 1 {
            return Err(ServiceError::MultipleMatches);
        }

        users.pop().ok_or(ServiceError::Repository(RepositoryError::NotFound))
    }

    /// Returns true if some user already registered `email`
    pub async fn email_taken(&self, email: &str) -> ServiceResult<bool> {
        match self.repo.select_by_email(email).await {
            Ok(_) => Ok(true),
            Err(RepositoryError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks an email/password pair
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`, and
    /// both run one Argon2 verification.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = match self.find_one_user_by(&UserFilter::Email(email.to_string())).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                verify_dummy_password(password);
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Applies a partial update and returns the stored result
    ///
    /// A new password is hashed before it replaces the old hash.
    pub async fn patch_user(&self, id: Uuid, mut patch: UserPatch) -> ServiceResult<User> {
        let mut user = self.repo.select_by_id(id).await?;

        if let Some(password) = patch.password.take() {
            user.password_hash = hash_password(&password)?;
        }
        patch.merge_into(&mut user);

        self.repo.update(&user).await?;
        info!(user_id = %id, "Updated user");

        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::default()))
    }

    fn request(login: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            login: login.to_string(),
            email: email.to_string(),
            password: "p@ssW0rd1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_verifies_password() {
        let service = service();
        let id = service.create_user(request("alice", "alice@x.io")).await.unwrap();

        let user = service.get_user(id).await.unwrap();
        assert_eq!(user.login, "alice");
        assert_eq!(user.email, "alice@x.io");
        assert_ne!(user.password_hash, "p@ssW0rd1");
        assert!(verify_password("p@ssW0rd1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let id = service.create_user(request("alice", "alice@x.io")).await.unwrap();

        service.delete_user(id).await.unwrap();
        assert!(service.get_user(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_one_user_by_multiple_matches() {
        let service = service();
        service.create_user(request("sam", "sam1@x.io")).await.unwrap();
        service.create_user(request("sam", "sam2@x.io")).await.unwrap();

        let result = service.find_one_user_by(&UserFilter::Login("sam".to_string())).await;
        assert!(matches!(result, Err(ServiceError::MultipleMatches)));

        let result = service.find_users_by(&UserFilter::Login("max".to_string())).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let service = service();
        let id = service.create_user(request("alice", "alice@x.io")).await.unwrap();

        let user = service.verify_credentials("alice@x.io", "p@ssW0rd1").await.unwrap();
        assert_eq!(user.id, id);

        assert!(matches!(
            service.verify_credentials("alice@x.io", "wrong").await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service.verify_credentials("nobody@x.io", "p@ssW0rd1").await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_runs_a_verification() {
        let service = service();

        assert!(matches!(
            service.verify_credentials("ghost@x.io", "p@ssW0rd1").await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(once_cell::sync::Lazy::get(&crate::auth::password::DUMMY_HASH).is_some());
    }

    #[tokio::test]
    async fn test_patch_user_subset() {
        let service = service();
        let id = service.create_user(request("alice", "alice@x.io")).await.unwrap();
        let before = service.get_user(id).await.unwrap();

        let patch = UserPatch {
            login: Some("alicia".to_string()),
            ..Default::default()
        };
        let after = service.patch_user(id, patch).await.unwrap();

        assert_eq!(after.login, "alicia");
        assert_eq!(after.email, before.email);
        assert_eq!(after.password_hash, before.password_hash);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(service.get_user(id).await.unwrap(), after);
    }

    #[tokio::test]
    async fn test_patch_user_rehashes_password() {
        let service = service();
        let id = service.create_user(request("alice", "alice@x.io")).await.unwrap();

        let patch = UserPatch {
            password: Some("N3wSecret".to_string()),
            ..Default::default()
        };
        let user = service.patch_user(id, patch).await.unwrap();

        assert!(verify_password("N3wSecret", &user.password_hash).unwrap());
        assert!(!verify_password("p@ssW0rd1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_email_taken() {
        let service = service();
        service.create_user(request("alice", "alice@x.io")).await.unwrap();

        assert!(service.email_taken("alice@x.io").await.unwrap());
        assert!(!service.email_taken("bob@x.io").await.unwrap());
    }
}
