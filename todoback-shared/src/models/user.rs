/// User model and request types
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id_user    UUID PRIMARY KEY,
///     login      VARCHAR(255) NOT NULL,
///     email      VARCHAR(255) NOT NULL,
///     password   VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     id_image   UUID
/// );
/// ```
///
/// Email uniqueness is checked by the user service before insert; the unique
/// index only backs that check up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::patch::{set_if_present, Merge, Patch};

/// User account
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display login
    pub login: String,

    /// Email address used to log in
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Optional profile image reference
    pub image_id: Option<Uuid>,
}

/// Body of `POST /users` and `POST /auth/register`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "login must not be empty"))]
    pub login: String,

    #[validate(email(message = "invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed by the user service
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Body of `PATCH /users/{id}`
///
/// `image_id: null` clears the profile image; every other omitted or null
/// field is left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, max = 255, message = "login must not be empty"))]
    pub login: Option<String>,

    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,

    /// New plaintext password
    pub password: Option<String>,

    #[serde(default)]
    pub image_id: Patch<Uuid>,
}

impl Merge<User> for UserPatch {
    /// Copies login, email and image. The password is not merged here because
    /// it has to be hashed first; see `UserService::patch_user`.
    fn merge_into(self, target: &mut User) {
        set_if_present(&mut target.login, self.login);
        set_if_present(&mut target.email, self.email);
        self.image_id.apply_to(&mut target.image_id);
    }
}

/// Lookup key for user queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Email(String),
    Login(String),
}

impl UserFilter {
    /// Column the filter applies to
    pub fn column(&self) -> &'static str {
        match self {
            UserFilter::Email(_) => "email",
            UserFilter::Login(_) => "login",
        }
    }

    /// Value the column must equal
    pub fn value(&self) -> &str {
        match self {
            UserFilter::Email(value) | UserFilter::Login(value) => value,
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Email(email) => &user.email == email,
            UserFilter::Login(login) => &user.login == login,
        }
    }
}

/// Query string of `GET /users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub email: Option<String>,
    pub login: Option<String>,
}

impl UserListQuery {
    /// Email wins over login when both are given
    pub fn filter(self) -> Option<UserFilter> {
        match (self.email, self.login) {
            (Some(email), _) => Some(UserFilter::Email(email)),
            (None, Some(login)) => Some(UserFilter::Login(login)),
            (None, None) => None,
        }
    }
}
