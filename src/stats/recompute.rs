use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{streak::fold_game, StatRecord};
use crate::competitor::repository::CompetitorRepository;
use crate::game::{repository::GameRepository, Game};
use crate::shared::AppError;

/// Replays an ordered game history from zero records.
///
/// Every id in `competitor_ids` gets an entry even without games; competitors
/// only seen in `games` are added as they appear. `games` must already be in
/// chronological order.
pub fn replay<'a, I>(competitor_ids: I, games: &[Game]) -> HashMap<String, StatRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records: HashMap<String, StatRecord> = competitor_ids
        .into_iter()
        .map(|id| (id.to_string(), StatRecord::default()))
        .collect();

    for game in games {
        for id in &game.competitor_ids {
            records.entry(id.clone()).or_default();
        }
        fold_game(&mut records, game);
    }

    records
}

/// Rebuilds a league's statistics table from its stored history.
pub struct LeagueRecomputer {
    game_repository: Arc<dyn GameRepository>,
    competitor_repository: Arc<dyn CompetitorRepository>,
}

impl LeagueRecomputer {
    pub fn new(
        game_repository: Arc<dyn GameRepository>,
        competitor_repository: Arc<dyn CompetitorRepository>,
    ) -> Self {
        Self {
            game_repository,
            competitor_repository,
        }
    }

    /// Computes fresh records for every competitor of the league. Persists nothing.
    #[instrument(skip(self))]
    pub async fn recompute(
        &self,
        league_id: &str,
    ) -> Result<HashMap<String, StatRecord>, AppError> {
        let games = self.game_repository.load_games_for_league(league_id).await?;
        self.recompute_with(league_id, games).await
    }

    /// Like [`recompute`](Self::recompute) but over a caller-supplied history,
    /// used when an edited game has not been persisted yet.
    #[instrument(skip(self, games), fields(game_count = games.len()))]
    pub async fn recompute_with(
        &self,
        league_id: &str,
        mut games: Vec<Game>,
    ) -> Result<HashMap<String, StatRecord>, AppError> {
        let competitors = self.competitor_repository.list_competitors(league_id).await?;
        Game::order_chronologically(&mut games);

        debug!(
            league_id = %league_id,
            competitor_count = competitors.len(),
            "Replaying league history"
        );

        let records = replay(competitors.iter().map(|c| c.id.as_str()), &games);

        info!(
            league_id = %league_id,
            record_count = records.len(),
            "League statistics recomputed"
        );

        Ok(records)
    }
}
