use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::TokenConfig;
use crate::competitor::repository::CompetitorRepository;
use crate::game::repository::GameRepository;
use crate::game::GameResultService;
use crate::league::repository::LeagueRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub league_repository: Arc<dyn LeagueRepository>,
    pub competitor_repository: Arc<dyn CompetitorRepository>,
    pub game_repository: Arc<dyn GameRepository>,
    /// Shared because it owns the per-league locks
    pub game_result_service: Arc<GameResultService>,
    pub token_config: TokenConfig,
}

impl AppState {
    pub fn new(
        league_repository: Arc<dyn LeagueRepository>,
        competitor_repository: Arc<dyn CompetitorRepository>,
        game_repository: Arc<dyn GameRepository>,
        game_result_service: Arc<GameResultService>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            league_repository,
            competitor_repository,
            game_repository,
            game_result_service,
            token_config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid teams: {0}")]
    InvalidTeams(String),

    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Recompute conflict: {0}")]
    RecomputeConflict(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidTeams(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MissingFields(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Missing required fields: {}", fields.join(", ")),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::RecomputeConflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

pub mod test_utils {
    //! Wiring helpers shared by unit and integration tests.

    use super::*;
    use crate::competitor::repository::InMemoryCompetitorRepository;
    use crate::game::repository::InMemoryGameRepository;
    use crate::game::LeagueLocks;
    use crate::league::repository::InMemoryLeagueRepository;
    use std::time::Duration;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        league_repository: Option<Arc<dyn LeagueRepository>>,
        competitor_repository: Option<Arc<dyn CompetitorRepository>>,
        game_repository: Option<Arc<dyn GameRepository>>,
        lock_timeout: Duration,
        token_config: TokenConfig,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                league_repository: None,
                competitor_repository: None,
                game_repository: None,
                lock_timeout: Duration::from_millis(200),
                token_config: TokenConfig::with_secret("test-secret", 1),
            }
        }

        pub fn with_league_repository(mut self, repo: Arc<dyn LeagueRepository>) -> Self {
            self.league_repository = Some(repo);
            self
        }

        pub fn with_competitor_repository(mut self, repo: Arc<dyn CompetitorRepository>) -> Self {
            self.competitor_repository = Some(repo);
            self
        }

        pub fn with_game_repository(mut self, repo: Arc<dyn GameRepository>) -> Self {
            self.game_repository = Some(repo);
            self
        }

        pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
            self.lock_timeout = lock_timeout;
            self
        }

        pub fn build(self) -> AppState {
            let league_repository = self
                .league_repository
                .unwrap_or_else(|| Arc::new(InMemoryLeagueRepository::new()));
            let competitor_repository = self
                .competitor_repository
                .unwrap_or_else(|| Arc::new(InMemoryCompetitorRepository::new()));
            let game_repository = self
                .game_repository
                .unwrap_or_else(|| Arc::new(InMemoryGameRepository::new()));

            let game_result_service = Arc::new(GameResultService::new(
                league_repository.clone(),
                competitor_repository.clone(),
                game_repository.clone(),
                LeagueLocks::new(self.lock_timeout),
            ));

            AppState {
                league_repository,
                competitor_repository,
                game_repository,
                game_result_service,
                token_config: self.token_config,
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
