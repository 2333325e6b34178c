use serde::{Deserialize, Serialize};

use crate::league::Actor;

/// JWT claims identifying the acting user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorClaims {
    pub sub: String,
    #[serde(default)]
    pub admin: bool,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

impl ActorClaims {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.sub.clone(),
            is_admin: self.admin,
        }
    }
}

/// Request extension carrying the resolved actor; `None` for anonymous requests
#[derive(Debug, Clone, Default)]
pub struct CurrentActor(pub Option<Actor>);

impl CurrentActor {
    pub fn actor(&self) -> Option<&Actor> {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialization() {
        let claims = ActorClaims {
            sub: "user-1".to_string(),
            admin: true,
            exp: 1234567890,
            iat: 1234567800,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("user-1"));

        let deserialized: ActorClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, claims);
        assert_eq!(deserialized.actor(), Actor::admin("user-1"));
    }

    #[test]
    fn test_admin_defaults_to_false() {
        let claims: ActorClaims =
            serde_json::from_str(r#"{"sub": "user-2", "exp": 10, "iat": 1}"#).unwrap();
        assert!(!claims.actor().is_admin);
    }
}
