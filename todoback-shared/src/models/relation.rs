/// User-team membership
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users_team_xref (
///     id_user UUID NOT NULL REFERENCES users (id_user),
///     id_team UUID NOT NULL REFERENCES team (id_team),
///     PRIMARY KEY (id_user, id_team)
/// );
/// ```
///
/// A relation has no identity of its own; it is addressed by the pair.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::FromRow)]
pub struct UserTeamRelation {
    #[serde(rename = "id_user")]
    pub user_id: Uuid,

    #[serde(rename = "id_team")]
    pub team_id: Uuid,
}

impl UserTeamRelation {
    pub fn new(user_id: Uuid, team_id: Uuid) -> Self {
        Self { user_id, team_id }
    }
}
