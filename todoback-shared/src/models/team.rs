/// Team model and request types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::patch::{set_if_present, Merge};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
}

/// Body of `POST /teams`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: String,
}

/// Body of `PATCH /teams/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TeamPatch {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: Option<String>,
}

impl Merge<Team> for TeamPatch {
    fn merge_into(self, target: &mut Team) {
        set_if_present(&mut target.name, self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut team = Team {
            id: Uuid::new_v4(),
            name: "core".to_string(),
        };

        TeamPatch::default().merge_into(&mut team);
        assert_eq!(team.name, "core");
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let patch = TeamPatch {
            name: Some(String::new()),
        };
        assert!(patch.validate().is_err());
    }
}
