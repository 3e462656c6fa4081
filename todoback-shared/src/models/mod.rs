/// Entities and request DTOs
///
/// # Models
///
/// - `user`: User accounts, login and registration bodies
/// - `task`: Tasks and the task list filter
/// - `todo`: Checklist items inside a task
/// - `team`: Teams
/// - `relation`: User-team membership rows
///
/// Entities derive `sqlx::FromRow` and `Serialize`; request bodies derive
/// `Deserialize` and are validated with `validator`. PATCH bodies implement
/// [`crate::patch::Merge`] for their entity.

pub mod relation;
pub mod task;
pub mod team;
pub mod todo;
pub mod user;

pub use relation::UserTeamRelation;
pub use task::{CreateTaskRequest, FilterError, Task, TaskFilter, TaskPatch};
pub use team::{CreateTeamRequest, Team, TeamPatch};
pub use todo::{CreateTodoRequest, Todo, TodoPatch};
pub use user::{CreateUserRequest, LoginRequest, User, UserFilter, UserListQuery, UserPatch};
