//! Per-entity use cases
//!
//! Services are stateless wrappers around one repository each. They generate
//! IDs, hash passwords and collapse empty filtered lookups into
//! [`RepositoryError::NotFound`]; everything else is passed straight through.
//! Cross-entity checks (does the referenced user exist, cascades on delete)
//! live in the HTTP handlers, which combine several services.

use crate::auth::password::PasswordError;
use crate::repository::{RepositoryError, Repositories};

pub mod relations;
pub mod tasks;
pub mod teams;
pub mod todos;
pub mod users;

pub use relations::RelationService;
pub use tasks::TaskService;
pub use teams::TeamService;
pub use todos::TodoService;
pub use users::UserService;

/// Service error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A lookup expected exactly one match and found several
    #[error("more than one entity matches")]
    MultipleMatches,

    /// Email/password pair did not match a user
    #[error("wrong credentials (email or password)")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Repository(RepositoryError::NotFound))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Turns an empty result set into NotFound
pub(crate) fn non_empty<T>(items: Vec<T>) -> ServiceResult<Vec<T>> {
    if items.is_empty() {
        Err(RepositoryError::NotFound.into())
    } else {
        Ok(items)
    }
}

/// All services, built over one set of repositories
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub tasks: TaskService,
    pub todos: TodoService,
    pub teams: TeamService,
    pub relations: RelationService,
}

impl Services {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            users: UserService::new(repositories.users),
            tasks: TaskService::new(repositories.tasks),
            todos: TodoService::new(repositories.todos),
            teams: TeamService::new(repositories.teams),
            relations: RelationService::new(repositories.relations),
        }
    }
}
