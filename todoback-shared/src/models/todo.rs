/// Todo model and request types
///
/// A todo is a checklist item inside a task and is removed together with it
/// (`ON DELETE CASCADE`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::task::MAX_TITLE_LENGTH;
use crate::patch::{set_if_present, Merge, Patch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Todo {
    pub id: Uuid,

    pub title: Option<String>,

    pub text: String,

    pub complete: bool,

    /// Task this todo belongs to
    #[serde(rename = "id_task")]
    pub task_id: Uuid,
}

/// Body of `POST /todos`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(max = 255, message = "title is too long"))]
    pub title: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub complete: bool,

    #[serde(rename = "id_task")]
    pub task_id: Uuid,
}

/// Body of `PATCH /todos/{id}`
///
/// `title: null` clears the title. Moving a todo to another task is allowed;
/// the target task must exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Patch<String>,

    pub text: Option<String>,

    pub complete: Option<bool>,

    #[serde(rename = "id_task")]
    pub task_id: Option<Uuid>,
}

impl Validate for TodoPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if matches!(self.title.value(), Some(title) if title.chars().count() > MAX_TITLE_LENGTH) {
            let mut error = ValidationError::new("length");
            error.message = Some("title is too long".into());
            errors.add("title", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Merge<Todo> for TodoPatch {
    fn merge_into(self, target: &mut Todo) {
        self.title.apply_to(&mut target.title);
        set_if_present(&mut target.text, self.text);
        set_if_present(&mut target.complete, self.complete);
        set_if_present(&mut target.task_id, self.task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let task_id = Uuid::new_v4();
        let body = format!(r#"{{"id_task": "{}"}}"#, task_id);

        let req: CreateTodoRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.task_id, task_id);
        assert_eq!(req.text, "");
        assert!(!req.complete);
        assert!(req.title.is_none());
    }

    #[test]
    fn test_create_request_requires_task() {
        let result = serde_json::from_str::<CreateTodoRequest>(r#"{"text": "milk"}"#);
        assert!(result.unwrap_err().to_string().contains("id_task"));
    }

    #[test]
    fn test_patch_merge() {
        let mut todo = Todo {
            id: Uuid::new_v4(),
            title: Some("groceries".to_string()),
            text: "milk".to_string(),
            complete: false,
            task_id: Uuid::new_v4(),
        };
        let task_id = todo.task_id;

        let patch: TodoPatch = serde_json::from_str(r#"{"complete": true, "title": null}"#).unwrap();
        patch.merge_into(&mut todo);

        assert!(todo.complete);
        assert_eq!(todo.title, None);
        assert_eq!(todo.text, "milk");
        assert_eq!(todo.task_id, task_id);
    }

    #[test]
    fn test_patch_validation() {
        let patch = TodoPatch {
            title: Patch::Value("x".repeat(300)),
            ..TodoPatch::default()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let patch: TodoPatch = serde_json::from_str(r#"{"title": null, "text": "eggs"}"#).unwrap();
        assert!(patch.validate().is_ok());
    }
}
