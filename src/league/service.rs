use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    access::{authorize, AccessMode},
    models::{Actor, League},
    repository::LeagueRepository,
    types::CreateLeagueRequest,
};
use crate::competitor::{repository::CompetitorRepository, Standing};
use crate::shared::AppError;

/// Loads a league and checks `actor` against it in one step.
///
/// A missing league and a hidden one produce the same `NotFound`.
#[instrument(skip(repository, actor))]
pub async fn load_authorized_league(
    repository: &dyn LeagueRepository,
    league_id: &str,
    actor: Option<&Actor>,
    mode: AccessMode,
) -> Result<League, AppError> {
    let league = repository
        .load_league(league_id)
        .await?
        .ok_or_else(|| AppError::NotFound("League not found".to_string()))?;

    authorize(&league, actor, mode)?;
    Ok(league)
}

/// Service for league reads and creation
pub struct LeagueService {
    league_repository: Arc<dyn LeagueRepository>,
    competitor_repository: Arc<dyn CompetitorRepository>,
}

impl LeagueService {
    pub fn new(
        league_repository: Arc<dyn LeagueRepository>,
        competitor_repository: Arc<dyn CompetitorRepository>,
    ) -> Self {
        Self {
            league_repository,
            competitor_repository,
        }
    }

    /// Creates a league moderated by its creator
    #[instrument(skip(self, actor))]
    pub async fn create_league(
        &self,
        request: CreateLeagueRequest,
        actor: Option<&Actor>,
    ) -> Result<League, AppError> {
        let actor =
            actor.ok_or_else(|| AppError::Unauthorized("Sign in to create a league".to_string()))?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::MissingFields(vec!["name".to_string()]));
        }

        let mut league = League::new(name.to_string(), request.public, request.members_are_mods);
        league.moderators.insert(actor.user_id.clone());

        self.league_repository.create_league(&league).await?;

        info!(league_id = %league.id, owner = %actor.user_id, "League created");
        Ok(league)
    }

    #[instrument(skip(self, actor))]
    pub async fn get_league(&self, league_id: &str, actor: Option<&Actor>) -> Result<League, AppError> {
        load_authorized_league(
            self.league_repository.as_ref(),
            league_id,
            actor,
            AccessMode::Read,
        )
        .await
    }

    /// Every competitor of the league with its statistics, best first
    #[instrument(skip(self, actor))]
    pub async fn standings(
        &self,
        league_id: &str,
        actor: Option<&Actor>,
    ) -> Result<Vec<Standing>, AppError> {
        self.get_league(league_id, actor).await?;

        let competitors = self.competitor_repository.list_competitors(league_id).await?;
        let mut standings = Vec::with_capacity(competitors.len());
        for competitor in competitors {
            let stats = self
                .competitor_repository
                .load_stat_record(&competitor.id)
                .await?;
            standings.push(Standing { competitor, stats });
        }
        Standing::rank(&mut standings);

        debug!(league_id = %league_id, entries = standings.len(), "Standings assembled");
        Ok(standings)
    }
}
