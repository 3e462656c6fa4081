//! User-team membership use cases

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{non_empty, ServiceResult};
use crate::models::UserTeamRelation;
use crate::repository::RelationRepository;

#[derive(Clone)]
pub struct RelationService {
    repo: Arc<dyn RelationRepository>,
}

impl RelationService {
    pub fn new(repo: Arc<dyn RelationRepository>) -> Self {
        Self { repo }
    }

    /// Adds `user_id` to `team_id`; AlreadyExists if it is a member already
    pub async fn add_member(&self, user_id: Uuid, team_id: Uuid) -> ServiceResult<()> {
        self.repo
            .insert(&UserTeamRelation::new(user_id, team_id))
            .await?;
        info!(user_id = %user_id, team_id = %team_id, "Added user to team");
        Ok(())
    }

    pub async fn get_relation(&self, user_id: Uuid, team_id: Uuid) -> ServiceResult<UserTeamRelation> {
        Ok(self.repo.select_by_ids(user_id, team_id).await?)
    }

    /// Members of a team; NotFound when it has none
    pub async fn get_relations_by_team_id(&self, team_id: Uuid) -> ServiceResult<Vec<UserTeamRelation>> {
        non_empty(self.repo.select_by_team_id(team_id).await?)
    }

    /// Teams of a user; NotFound when there are none
    pub async fn get_relations_by_user_id(&self, user_id: Uuid) -> ServiceResult<Vec<UserTeamRelation>> {
        non_empty(self.repo.select_by_user_id(user_id).await?)
    }

    pub async fn delete_relation(&self, user_id: Uuid, team_id: Uuid) -> ServiceResult<()> {
        self.repo.delete_by_ids(user_id, team_id).await?;
        info!(user_id = %user_id, team_id = %team_id, "Removed user from team");
        Ok(())
    }

    pub async fn delete_relations_by_team_id(&self, team_id: Uuid) -> ServiceResult<u64> {
        Ok(self.repo.delete_by_team_id(team_id).await?)
    }

    pub async fn delete_relations_by_user_id(&self, user_id: Uuid) -> ServiceResult<u64> {
        Ok(self.repo.delete_by_user_id(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryRelationRepository, RepositoryError};
    use crate::service::ServiceError;

    #[tokio::test]
    async fn test_membership_lifecycle() {
        let service = RelationService::new(Arc::new(InMemoryRelationRepository::default()));
        let (user, team) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(service.get_relations_by_team_id(team).await.unwrap_err().is_not_found());

        service.add_member(user, team).await.unwrap();
        assert!(matches!(
            service.add_member(user, team).await,
            Err(ServiceError::Repository(RepositoryError::AlreadyExists))
        ));

        assert_eq!(service.get_relation(user, team).await.unwrap().team_id, team);
        assert_eq!(service.get_relations_by_user_id(user).await.unwrap().len(), 1);

        service.delete_relation(user, team).await.unwrap();
        assert!(service.get_relation(user, team).await.unwrap_err().is_not_found());
    }
}
