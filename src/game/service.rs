use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    locks::LeagueLocks,
    models::Game,
    repository::GameRepository,
    types::{CreateGameRequest, RecordResultRequest, RecordResultResponse},
};
use crate::competitor::repository::CompetitorRepository;
use crate::league::{load_authorized_league, repository::LeagueRepository, AccessMode, Actor};
use crate::shared::AppError;
use crate::stats::{apply_loss, apply_win, LeagueRecomputer, StatRecord};

/// Records game results and keeps competitor statistics in step with them.
///
/// A first result for a game is folded into the two competitors' records
/// directly. A correction to an existing result replays the whole league,
/// because later games may have built on the streaks it produced.
pub struct GameResultService {
    league_repository: Arc<dyn LeagueRepository>,
    competitor_repository: Arc<dyn CompetitorRepository>,
    game_repository: Arc<dyn GameRepository>,
    recomputer: LeagueRecomputer,
    locks: LeagueLocks,
}

impl GameResultService {
    pub fn new(
        league_repository: Arc<dyn LeagueRepository>,
        competitor_repository: Arc<dyn CompetitorRepository>,
        game_repository: Arc<dyn GameRepository>,
        locks: LeagueLocks,
    ) -> Self {
        let recomputer = LeagueRecomputer::new(game_repository.clone(), competitor_repository.clone());
        Self {
            league_repository,
            competitor_repository,
            game_repository,
            recomputer,
            locks,
        }
    }

    pub fn locks(&self) -> &LeagueLocks {
        &self.locks
    }

    /// Schedules an unplayed game between two competitors of the league
    #[instrument(skip(self, request, actor))]
    pub async fn create_game(
        &self,
        league_id: &str,
        request: CreateGameRequest,
        actor: Option<&Actor>,
    ) -> Result<Game, AppError> {
        let league = load_authorized_league(
            self.league_repository.as_ref(),
            league_id,
            actor,
            AccessMode::Write,
        )
        .await?;

        let [first, second]: [String; 2] = request.competitor_ids.try_into().map_err(|ids: Vec<String>| {
            AppError::InvalidTeams(format!("A game needs exactly 2 competitors, got {}", ids.len()))
        })?;
        if first == second {
            return Err(AppError::InvalidTeams(
                "A competitor cannot play itself".to_string(),
            ));
        }

        for competitor_id in [&first, &second] {
            let competitor = self
                .competitor_repository
                .get_competitor(competitor_id)
                .await?;
            if competitor.map(|c| c.league_id != league.id).unwrap_or(true) {
                return Err(AppError::InvalidTeams(format!(
                    "Competitor {} is not part of this league",
                    competitor_id
                )));
            }
        }

        let game = Game::new(
            league.id.clone(),
            [first, second],
            request.date.unwrap_or_else(Utc::now),
        );
        self.game_repository.create_game(&game).await?;

        info!(game_id = %game.id, league_id = %league.id, "Game scheduled");
        Ok(game)
    }

    /// Records the result of a game, or corrects a previously recorded one.
    #[instrument(skip(self, request, actor))]
    pub async fn record_result(
        &self,
        game_id: &str,
        request: RecordResultRequest,
        actor: Option<&Actor>,
    ) -> Result<RecordResultResponse, AppError> {
        let game = self.find_game(game_id).await?;
        load_authorized_league(
            self.league_repository.as_ref(),
            &game.league_id,
            actor,
            AccessMode::Write,
        )
        .await?;

        let fields = request.required_fields()?;
        if fields.winner_id == fields.loser_id {
            return Err(AppError::InvalidTeams(
                "Winner and loser must be different competitors".to_string(),
            ));
        }
        if !game.involves(fields.winner_id) || !game.involves(fields.loser_id) {
            return Err(AppError::InvalidTeams(
                "Winner and loser must be the game's two competitors".to_string(),
            ));
        }

        let _guard = if game.is_played() {
            self.locks.acquire_for_recompute(&game.league_id).await?
        } else {
            self.locks.acquire(&game.league_id).await
        };

        // state may have moved while waiting for the lock
        let current = self.find_game(game_id).await?;
        let updated = current.with_result(
            fields.winner_id,
            fields.loser_id,
            fields.redemption,
            request.date.unwrap_or(current.date),
        );

        let (stats, recomputed) = if current.is_played() {
            info!(game_id = %game_id, league_id = %current.league_id, "Correcting recorded result, replaying league");
            (self.replay_with(&updated).await?, true)
        } else if self.predates_recorded_result(&updated).await? {
            info!(game_id = %game_id, league_id = %current.league_id, "Result predates a recorded game, replaying league");
            (self.replay_with(&updated).await?, true)
        } else {
            (self.fold_new_result(&updated).await?, false)
        };

        self.persist(&current, &updated, &stats).await?;

        info!(
            game_id = %game_id,
            winner_id = %fields.winner_id,
            loser_id = %fields.loser_id,
            recomputed,
            "Game result recorded"
        );

        Ok(RecordResultResponse {
            game: updated,
            recomputed,
            stats,
        })
    }

    /// Replays the league's stored history and overwrites every competitor's record.
    #[instrument(skip(self))]
    pub async fn recompute_league(
        &self,
        league_id: &str,
    ) -> Result<HashMap<String, StatRecord>, AppError> {
        let _guard = self.locks.acquire_for_recompute(league_id).await?;

        let records = self.recomputer.recompute(league_id).await?;
        self.competitor_repository.save_stat_records(&records).await?;

        info!(league_id = %league_id, record_count = records.len(), "League statistics rewritten");
        Ok(records)
    }

    /// Write-authorized entry point for [`recompute_league`](Self::recompute_league)
    #[instrument(skip(self, actor))]
    pub async fn recompute(
        &self,
        league_id: &str,
        actor: Option<&Actor>,
    ) -> Result<HashMap<String, StatRecord>, AppError> {
        load_authorized_league(
            self.league_repository.as_ref(),
            league_id,
            actor,
            AccessMode::Write,
        )
        .await?;
        self.recompute_league(league_id).await
    }

    async fn find_game(&self, game_id: &str) -> Result<Game, AppError> {
        self.game_repository
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))
    }

    /// Whether either competitor already has a result that replays after `game`.
    ///
    /// Folding onto such a record would not match a replay.
    async fn predates_recorded_result(&self, game: &Game) -> Result<bool, AppError> {
        let Some((winner_id, loser_id)) = game.result() else {
            return Ok(false);
        };

        let games = self
            .game_repository
            .load_games_for_league(&game.league_id)
            .await?;
        Ok(games.iter().any(|other| {
            other.id != game.id
                && other.is_played()
                && (other.involves(winner_id) || other.involves(loser_id))
                && other.is_after(game)
        }))
    }

    async fn fold_new_result(&self, game: &Game) -> Result<HashMap<String, StatRecord>, AppError> {
        let Some((winner_id, loser_id)) = game.result() else {
            return Err(AppError::Internal);
        };

        let winner = self.competitor_repository.load_stat_record(winner_id).await?;
        let loser = self.competitor_repository.load_stat_record(loser_id).await?;
        debug!(winner_id = %winner_id, loser_id = %loser_id, "Folding new result incrementally");

        let mut stats = HashMap::with_capacity(2);
        stats.insert(winner_id.to_string(), apply_win(&winner, game));
        stats.insert(loser_id.to_string(), apply_loss(&loser, game));
        Ok(stats)
    }

    async fn replay_with(&self, updated: &Game) -> Result<HashMap<String, StatRecord>, AppError> {
        let mut games = self
            .game_repository
            .load_games_for_league(&updated.league_id)
            .await?;
        match games.iter_mut().find(|g| g.id == updated.id) {
            Some(stored) => *stored = updated.clone(),
            None => games.push(updated.clone()),
        }

        self.recomputer
            .recompute_with(&updated.league_id, games)
            .await
    }

    /// Writes the game then its records, restoring the game if the records fail.
    async fn persist(
        &self,
        previous: &Game,
        updated: &Game,
        stats: &HashMap<String, StatRecord>,
    ) -> Result<(), AppError> {
        self.game_repository.save_game(updated).await?;

        if let Err(err) = self.competitor_repository.save_stat_records(stats).await {
            warn!(game_id = %updated.id, error = %err, "Stat write failed, restoring previous result");
            if let Err(restore_err) = self.game_repository.save_game(previous).await {
                error!(game_id = %updated.id, error = %restore_err, "Failed to restore previous result");
            }
            return Err(err);
        }

        Ok(())
    }
}
