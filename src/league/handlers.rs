use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::{models::League, service::LeagueService, types::CreateLeagueRequest};
use crate::auth::CurrentActor;
use crate::competitor::Standing;
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a league
///
/// POST /leagues
/// The caller becomes the league's first moderator
#[instrument(name = "create_league", skip(state, actor, request))]
pub async fn create_league(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Json(request): Json<CreateLeagueRequest>,
) -> Result<Json<League>, AppError> {
    let service = LeagueService::new(
        state.league_repository.clone(),
        state.competitor_repository.clone(),
    );
    let league = service.create_league(request, actor.actor()).await?;

    info!(league_id = %league.id, "League created via API");
    Ok(Json(league))
}

/// HTTP handler for reading a league
///
/// GET /leagues/:league_id
#[instrument(name = "get_league", skip(state, actor))]
pub async fn get_league(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path(league_id): Path<String>,
) -> Result<Json<League>, AppError> {
    let service = LeagueService::new(
        state.league_repository.clone(),
        state.competitor_repository.clone(),
    );
    Ok(Json(service.get_league(&league_id, actor.actor()).await?))
}

/// HTTP handler for the league table
///
/// GET /leagues/:league_id/standings
#[instrument(name = "get_standings", skip(state, actor))]
pub async fn get_standings(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path(league_id): Path<String>,
) -> Result<Json<Vec<Standing>>, AppError> {
    let service = LeagueService::new(
        state.league_repository.clone(),
        state.competitor_repository.clone(),
    );
    let standings = service.standings(&league_id, actor.actor()).await?;

    info!(league_id = %league_id, entries = standings.len(), "Standings served");
    Ok(Json(standings))
}
