//! Todo use cases

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ServiceResult;
use crate::models::{CreateTodoRequest, Todo};
use crate::repository::TodoRepository;

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_todo(&self, req: CreateTodoRequest) -> ServiceResult<Uuid> {
        let todo = Todo {
            id: Uuid::new_v4(),
            title: req.title,
            text: req.text,
            complete: req.complete,
            task_id: req.task_id,
        };

        let id = self.repo.insert(&todo).await?;
        info!(todo_id = %id, task_id = %todo.task_id, "Created todo");

        Ok(id)
    }

    pub async fn get_todo(&self, id: Uuid) -> ServiceResult<Todo> {
        Ok(self.repo.select_by_id(id).await?)
    }

    pub async fn get_todos(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.repo.select_all().await?)
    }

    pub async fn update_todo(&self, todo: &Todo) -> ServiceResult<()> {
        Ok(self.repo.update(todo).await?)
    }

    pub async fn delete_todo(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(todo_id = %id, "Deleted todo");
        Ok(())
    }
}
