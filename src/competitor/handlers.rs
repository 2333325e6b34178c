use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use super::{models::Standing, service::CompetitorService, types::CreateCompetitorRequest};
use crate::auth::CurrentActor;
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> CompetitorService {
    CompetitorService::new(
        state.league_repository.clone(),
        state.competitor_repository.clone(),
        state.game_repository.clone(),
        state.game_result_service.locks().clone(),
    )
}

/// HTTP handler for registering a team or player
///
/// POST /leagues/:league_id/competitors
/// Returns the competitor with its zeroed statistics
#[instrument(name = "create_competitor", skip(state, actor, request))]
pub async fn create_competitor(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path(league_id): Path<String>,
    Json(request): Json<CreateCompetitorRequest>,
) -> Result<Json<Standing>, AppError> {
    let standing = service(&state)
        .create_competitor(&league_id, request, actor.actor())
        .await?;
    Ok(Json(standing))
}

/// HTTP handler for removing a competitor without games
///
/// DELETE /leagues/:league_id/competitors/:competitor_id
#[instrument(name = "delete_competitor", skip(state, actor))]
pub async fn delete_competitor(
    State(state): State<AppState>,
    Extension(actor): Extension<CurrentActor>,
    Path((league_id, competitor_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    service(&state)
        .delete_competitor(&league_id, &competitor_id, actor.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
