use serde::{Deserialize, Serialize};

use super::models::CompetitorKind;

/// Request payload for registering a team or player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitorRequest {
    pub name: String,
    #[serde(default)]
    pub kind: CompetitorKind,
    /// User to add to the league's members
    pub owner_id: Option<String>,
}
