use serde::{Deserialize, Serialize};

/// Request payload for creating a league
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeagueRequest {
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub members_are_mods: bool,
}
