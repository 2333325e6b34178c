// Library crate for the streakboard league statistics server
// This file exposes the public API for integration tests

pub mod auth;
pub mod competitor;
pub mod config;
pub mod game;
pub mod league;
pub mod shared;
pub mod stats;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use game::{Game, GameResultService, LeagueLocks};
pub use league::{Actor, League};
pub use shared::{AppError, AppState};
pub use stats::StatRecord;

/// Builds the HTTP router with actor resolution and request tracing.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/leagues", post(league::create_league))
        .route("/leagues/:league_id", get(league::get_league))
        .route("/leagues/:league_id/standings", get(league::get_standings))
        .route("/leagues/:league_id/recompute", post(game::recompute_league))
        .route(
            "/leagues/:league_id/competitors",
            post(competitor::create_competitor),
        )
        .route(
            "/leagues/:league_id/competitors/:competitor_id",
            delete(competitor::delete_competitor),
        )
        .route("/leagues/:league_id/games", post(game::create_game))
        .route(
            "/leagues/:league_id/games/:game_id/result",
            put(game::record_result),
        )
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::resolve_actor,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
