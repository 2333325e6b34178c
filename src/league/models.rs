use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A league owns its competitors and games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    pub public: bool,
    /// Members may write as if they were moderators
    pub members_are_mods: bool,
    pub members: HashSet<String>,
    pub moderators: HashSet<String>,
}

impl League {
    /// Creates a new league with a generated ID and no members
    pub fn new(name: String, public: bool, members_are_mods: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            public,
            members_are_mods,
            members: HashSet::new(),
            moderators: HashSet::new(),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.contains(user_id)
    }

    pub fn is_moderator(&self, user_id: &str) -> bool {
        self.moderators.contains(user_id)
    }
}

/// The user on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: true,
        }
    }
}
