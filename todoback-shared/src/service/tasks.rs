//! Task use cases

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{non_empty, ServiceResult};
use crate::models::{CreateTaskRequest, Task, TaskFilter};
use crate::repository::TaskRepository;

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Stores a new task owned by `user_id`
    ///
    /// `req.user_id` is ignored; the handler resolves the owner.
    pub async fn create_task(&self, user_id: Uuid, req: CreateTaskRequest) -> ServiceResult<Uuid> {
        let task = Task {
            id: Uuid::new_v4(),
            title: req.title,
            priority: req.priority,
            user_id,
            team_id: req.team_id,
        };

        let id = self.repo.insert(&task).await?;
        info!(task_id = %id, user_id = %user_id, "Created task");

        Ok(id)
    }

    pub async fn get_task(&self, id: Uuid) -> ServiceResult<Task> {
        Ok(self.repo.select_by_id(id).await?)
    }

    pub async fn get_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.select_all().await?)
    }

    /// Tasks matching the filter; NotFound when there are none
    pub async fn find_tasks_by(&self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        non_empty(self.repo.select_by(filter).await?)
    }

    pub async fn update_task(&self, task: &Task) -> ServiceResult<()> {
        Ok(self.repo.update(task).await?)
    }

    pub async fn delete_task(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(task_id = %id, "Deleted task");
        Ok(())
    }

    pub async fn delete_tasks_by_user_id(&self, user_id: Uuid) -> ServiceResult<u64> {
        let deleted = self.repo.delete_by_user_id(user_id).await?;
        info!(user_id = %user_id, deleted, "Deleted tasks of user");
        Ok(deleted)
    }

    pub async fn delete_tasks_by_team_id(&self, team_id: Uuid) -> ServiceResult<u64> {
        let deleted = self.repo.delete_by_team_id(team_id).await?;
        info!(team_id = %team_id, deleted, "Deleted tasks of team");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryTaskRepository;

    fn request(title: &str, team_id: Option<Uuid>) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            priority: Some(1),
            user_id: None,
            team_id,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_owner() {
        let service = TaskService::new(Arc::new(InMemoryTaskRepository::default()));
        let owner = Uuid::new_v4();

        let id = service.create_task(owner, request("plan", None)).await.unwrap();
        let task = service.get_task(id).await.unwrap();

        assert_eq!(task.user_id, owner);
        assert_eq!(task.title, "plan");
        assert_eq!(task.priority, Some(1));
    }

    #[tokio::test]
    async fn test_find_tasks_by_collapses_empty() {
        let service = TaskService::new(Arc::new(InMemoryTaskRepository::default()));
        let team = Uuid::new_v4();
        service.create_task(Uuid::new_v4(), request("a", Some(team))).await.unwrap();

        assert_eq!(service.find_tasks_by(&TaskFilter::by_team(team)).await.unwrap().len(), 1);
        assert!(service
            .find_tasks_by(&TaskFilter::by_user(Uuid::new_v4()))
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(service.get_tasks().await.unwrap().len(), 1);
    }
}
