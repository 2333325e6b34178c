use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{
    models::{Competitor, Standing},
    repository::CompetitorRepository,
    types::CreateCompetitorRequest,
};
use crate::game::{repository::GameRepository, LeagueLocks};
use crate::league::{load_authorized_league, repository::LeagueRepository, AccessMode, Actor};
use crate::shared::AppError;

/// Service for the competitor lifecycle
pub struct CompetitorService {
    league_repository: Arc<dyn LeagueRepository>,
    competitor_repository: Arc<dyn CompetitorRepository>,
    game_repository: Arc<dyn GameRepository>,
    locks: LeagueLocks,
}

impl CompetitorService {
    pub fn new(
        league_repository: Arc<dyn LeagueRepository>,
        competitor_repository: Arc<dyn CompetitorRepository>,
        game_repository: Arc<dyn GameRepository>,
        locks: LeagueLocks,
    ) -> Self {
        Self {
            league_repository,
            competitor_repository,
            game_repository,
            locks,
        }
    }

    /// Registers a team or player with a zeroed StatRecord.
    ///
    /// The owner, if any, joins the league's members. Should that fail the
    /// competitor is removed again.
    #[instrument(skip(self, request, actor))]
    pub async fn create_competitor(
        &self,
        league_id: &str,
        request: CreateCompetitorRequest,
        actor: Option<&Actor>,
    ) -> Result<Standing, AppError> {
        let authorized = load_authorized_league(
            self.league_repository.as_ref(),
            league_id,
            actor,
            AccessMode::Write,
        )
        .await?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::MissingFields(vec!["name".to_string()]));
        }

        // membership is read-modify-write on the whole league
        let _guard = self.locks.acquire(&authorized.id).await;
        let mut league = self
            .league_repository
            .load_league(&authorized.id)
            .await?
            .ok_or_else(|| AppError::NotFound("League not found".to_string()))?;

        let competitor = Competitor::new(
            league.id.clone(),
            name.to_string(),
            request.kind,
            request.owner_id.clone(),
        );
        self.competitor_repository
            .create_competitor(&competitor)
            .await?;

        if let Some(owner_id) = &request.owner_id {
            if league.members.insert(owner_id.clone()) {
                if let Err(err) = self.league_repository.save_league(&league).await {
                    warn!(competitor_id = %competitor.id, error = %err, "Membership update failed, removing competitor");
                    if let Err(rollback_err) = self
                        .competitor_repository
                        .delete_competitor(&competitor.id)
                        .await
                    {
                        error!(competitor_id = %competitor.id, error = %rollback_err, "Failed to remove competitor after membership failure");
                    }
                    return Err(err);
                }
            }
        }

        let stats = self
            .competitor_repository
            .load_stat_record(&competitor.id)
            .await?;

        info!(
            competitor_id = %competitor.id,
            league_id = %league.id,
            kind = %competitor.kind,
            "Competitor created"
        );

        Ok(Standing { competitor, stats })
    }

    /// Deletes a competitor that has no games in the league's history.
    #[instrument(skip(self, actor))]
    pub async fn delete_competitor(
        &self,
        league_id: &str,
        competitor_id: &str,
        actor: Option<&Actor>,
    ) -> Result<(), AppError> {
        let league = load_authorized_league(
            self.league_repository.as_ref(),
            league_id,
            actor,
            AccessMode::Write,
        )
        .await?;

        let _guard = self.locks.acquire(&league.id).await;

        let competitor = self
            .competitor_repository
            .get_competitor(competitor_id)
            .await?
            .filter(|c| c.league_id == league.id)
            .ok_or_else(|| AppError::NotFound("Competitor not found".to_string()))?;

        let games = self.game_repository.load_games_for_league(&league.id).await?;
        if games.iter().any(|game| game.involves(&competitor.id)) {
            return Err(AppError::InvalidTeams(format!(
                "Competitor {} still appears in league games",
                competitor.id
            )));
        }

        self.competitor_repository
            .delete_competitor(&competitor.id)
            .await?;

        info!(competitor_id = %competitor.id, league_id = %league.id, "Competitor deleted");
        Ok(())
    }
}
