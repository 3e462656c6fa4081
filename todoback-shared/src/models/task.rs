/// Task model, request types and list filter
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task (
///     id_task  UUID PRIMARY KEY,
///     title    VARCHAR(255) NOT NULL,
///     priority INTEGER CHECK (priority >= 0),
///     id_user  UUID NOT NULL REFERENCES users (id_user),
///     id_team  UUID REFERENCES team (id_team)
/// );
/// ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::patch::{set_if_present, Merge, Patch};

/// Task owned by a user and optionally shared with a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    pub title: String,

    /// Non-negative priority, higher is more urgent
    pub priority: Option<i32>,

    /// Owning user
    #[serde(rename = "id_user")]
    pub user_id: Uuid,

    /// Team the task is shared with
    #[serde(rename = "id_team")]
    pub team_id: Option<Uuid>,
}

/// Longest title the `task` and `todo` tables accept
pub const MAX_TITLE_LENGTH: usize = 255;

/// Body of `POST /tasks`
///
/// `id_user` defaults to the authenticated user when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "title must not be empty"))]
    pub title: String,

    #[validate(range(min = 0, message = "priority must not be negative"))]
    pub priority: Option<i32>,

    #[serde(rename = "id_user")]
    pub user_id: Option<Uuid>,

    #[serde(rename = "id_team")]
    pub team_id: Option<Uuid>,
}

/// Body of `PATCH /tasks/{id}`
///
/// Only title, priority and team can change. `priority: null` and
/// `id_team: null` clear those fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,

    #[serde(default)]
    pub priority: Patch<i32>,

    #[serde(default, rename = "id_team")]
    pub team_id: Patch<Uuid>,
}

impl Validate for TaskPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            let message = match title.chars().count() {
                0 => Some("title must not be empty"),
                n if n > MAX_TITLE_LENGTH => Some("title is too long"),
                _ => None,
            };

            if let Some(message) = message {
                let mut error = ValidationError::new("length");
                error.message = Some(message.into());
                errors.add("title", error);
            }
        }

        if matches!(self.priority.value(), Some(priority) if *priority < 0) {
            let mut error = ValidationError::new("range");
            error.message = Some("priority must not be negative".into());
            errors.add("priority", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Merge<Task> for TaskPatch {
    fn merge_into(self, target: &mut Task) {
        set_if_present(&mut target.title, self.title);
        self.priority.apply_to(&mut target.priority);
        self.team_id.apply_to(&mut target.team_id);
    }
}

/// Error building a [`TaskFilter`] from a query string
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    /// An id parameter did not hold a UUID
    #[error("invalid id {key}={value}")]
    InvalidId { key: String, value: String },

    /// An id-like parameter that is not a task column
    #[error("unknown column {0}")]
    UnknownColumn(String),
}

/// Column filters for task listings
///
/// Both set means both must match; none set lists every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

impl TaskFilter {
    pub fn by_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            team_id: None,
        }
    }

    pub fn by_team(team_id: Uuid) -> Self {
        Self {
            user_id: None,
            team_id: Some(team_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.team_id.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.user_id.map_or(true, |id| task.user_id == id)
            && self.team_id.map_or(true, |id| task.team_id == Some(id))
    }

    /// Builds a filter from `GET /tasks` query parameters
    ///
    /// `id_user` and `id_team` must hold UUIDs. Any other key containing `id`
    /// is rejected; keys without `id` are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, FilterError> {
        let mut filter = TaskFilter::default();

        for (key, value) in params {
            let slot = match key.as_str() {
                "id_user" => &mut filter.user_id,
                "id_team" => &mut filter.team_id,
                other if other.contains("id") => {
                    return Err(FilterError::UnknownColumn(other.to_string()))
                }
                _ => continue,
            };

            let id = Uuid::parse_str(value).map_err(|_| FilterError::InvalidId {
                key: key.clone(),
                value: value.clone(),
            })?;
            *slot = Some(id);
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "write report".to_string(),
            priority: Some(3),
            user_id: Uuid::new_v4(),
            team_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_task_json_shape() {
        let task = task();
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id_user"], task.user_id.to_string());
        assert_eq!(json["id_team"], task.team_id.unwrap().to_string());
        assert_eq!(json["priority"], 3);
    }

    #[test]
    fn test_patch_clears_team_and_keeps_title() {
        let mut target = task();

        let patch: TaskPatch = serde_json::from_str(r#"{"id_team": null, "priority": 9}"#).unwrap();
        patch.merge_into(&mut target);

        assert_eq!(target.title, "write report");
        assert_eq!(target.priority, Some(9));
        assert_eq!(target.team_id, None);
    }

    #[test]
    fn test_patch_validation() {
        let patch: TaskPatch = serde_json::from_str(r#"{"priority": -1}"#).unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("priority"));

        let patch: TaskPatch = serde_json::from_str(r#"{"title": "ok", "priority": null}"#).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_patch_title_length_matches_create() {
        let long = "x".repeat(300);

        let create = CreateTaskRequest {
            title: long.clone(),
            priority: None,
            user_id: None,
            team_id: None,
        };
        assert!(create.validate().is_err());

        let patch = TaskPatch {
            title: Some(long),
            ..TaskPatch::default()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let patch = TaskPatch {
            title: Some("x".repeat(MAX_TITLE_LENGTH)),
            ..TaskPatch::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_filter_from_query() {
        let user_id = Uuid::new_v4();
        let params = HashMap::from([
            ("id_user".to_string(), user_id.to_string()),
            ("sort".to_string(), "title".to_string()),
        ]);

        let filter = TaskFilter::from_query(&params).unwrap();
        assert_eq!(filter, TaskFilter::by_user(user_id));
    }

    #[test]
    fn test_filter_rejects_bad_input() {
        let params = HashMap::from([("id_user".to_string(), "nope".to_string())]);
        assert!(matches!(
            TaskFilter::from_query(&params),
            Err(FilterError::InvalidId { .. })
        ));

        let params = HashMap::from([("id_owner".to_string(), Uuid::new_v4().to_string())]);
        assert_eq!(
            TaskFilter::from_query(&params),
            Err(FilterError::UnknownColumn("id_owner".to_string()))
        );
    }

    #[test]
    fn test_filter_matches() {
        let task = task();

        assert!(TaskFilter::default().matches(&task));
        assert!(TaskFilter::by_user(task.user_id).matches(&task));
        assert!(!TaskFilter::by_team(Uuid::new_v4()).matches(&task));
    }
}
