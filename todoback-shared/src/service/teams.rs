//! Team use cases

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ServiceResult;
use crate::models::{CreateTeamRequest, Team};
use crate::repository::TeamRepository;

#[derive(Clone)]
pub struct TeamService {
    repo: Arc<dyn TeamRepository>,
}

impl TeamService {
    pub fn new(repo: Arc<dyn TeamRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_team(&self, req: CreateTeamRequest) -> ServiceResult<Uuid> {
        let team = Team {
            id: Uuid::new_v4(),
            name: req.name,
        };

        let id = self.repo.insert(&team).await?;
        info!(team_id = %id, "Created team");

        Ok(id)
    }

    pub async fn get_team(&self, id: Uuid) -> ServiceResult<Team> {
        Ok(self.repo.select_by_id(id).await?)
    }

    pub async fn get_teams(&self) -> ServiceResult<Vec<Team>> {
        Ok(self.repo.select_all().await?)
    }

    pub async fn update_team(&self, team: &Team) -> ServiceResult<()> {
        Ok(self.repo.update(team).await?)
    }

    pub async fn delete_team(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(team_id = %id, "Deleted team");
        Ok(())
    }
}
