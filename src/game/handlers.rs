use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::{
    models::Game,
    types::{CreateGameRequest, RecordResultRequest, RecordResultResponse},
};
use crate::auth::CurrentActor;
use crate::shared::{AppError, AppState};
use crate::stats::StatRecord;

/// HTTP handler for scheduling a game
///
/// POST /leagues/:league_id/games
#[instrument(name = "create_game", skip(state, actor, request))]
pub async fn create_game(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path(league_id): Path<String>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<Game>, AppError> {
    let game = state
        .game_result_service
        .create_game(&league_id, request, actor.actor())
        .await?;
    Ok(Json(game))
}

/// HTTP handler for recording or correcting a result
///
/// PUT /leagues/:league_id/games/:game_id/result
/// Returns the updated game and every StatRecord that was written
#[instrument(name = "record_result", skip(state, actor, request))]
pub async fn record_result(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path((league_id, game_id)): Path<(String, String)>,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<RecordResultResponse>, AppError> {
    // the game must belong to the league named in the path
    let belongs = state
        .game_repository
        .get_game(&game_id)
        .await?
        .map(|game| game.league_id == league_id)
        .unwrap_or(false);
    if !belongs {
        debug!(league_id = %league_id, game_id = %game_id, "Game not in league");
        return Err(AppError::NotFound("Game not found".to_string()));
    }

    let response = state
        .game_result_service
        .record_result(&game_id, request, actor.actor())
        .await?;

    info!(
        game_id = %game_id,
        recomputed = response.recomputed,
        records_written = response.stats.len(),
        "Result recorded via API"
    );
    Ok(Json(response))
}

/// HTTP handler for a full statistics rebuild
///
/// POST /leagues/:league_id/recompute
#[instrument(name = "recompute_league", skip(state, actor))]
pub async fn recompute_league(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path(league_id): Path<String>,
) -> Result<Json<HashMap<String, StatRecord>>, AppError> {
    let records = state
        .game_result_service
        .recompute(&league_id, actor.actor())
        .await?;
    Ok(Json(records))
}
