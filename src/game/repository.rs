use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::Game;
use crate::shared::AppError;

/// Trait for game repository operations
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create_game(&self, game: &Game) -> Result<(), AppError>;
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError>;
    /// Overwrites an existing game, result fields included
    async fn save_game(&self, game: &Game) -> Result<(), AppError>;
    /// Every game of the league ordered by `(date, id)` ascending
    async fn load_games_for_league(&self, league_id: &str) -> Result<Vec<Game>, AppError>;
}

/// In-memory implementation of GameRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<String, Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, game))]
    async fn create_game(&self, game: &Game) -> Result<(), AppError> {
        debug!(game_id = %game.id, league_id = %game.league_id, "Creating game in memory");

        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            warn!(game_id = %game.id, "Game already exists in memory");
            return Err(AppError::DatabaseError("Game already exists".to_string()));
        }
        games.insert(game.id.clone(), game.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError> {
        let games = self.games.read().await;
        Ok(games.get(game_id).cloned())
    }

    #[instrument(skip(self, game))]
    async fn save_game(&self, game: &Game) -> Result<(), AppError> {
        debug!(game_id = %game.id, played = game.is_played(), "Saving game in memory");

        let mut games = self.games.write().await;
        match games.get_mut(&game.id) {
            Some(stored) => {
                *stored = game.clone();
                Ok(())
            }
            None => {
                warn!(game_id = %game.id, "Game not found for update in memory");
                Err(AppError::NotFound("Game not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn load_games_for_league(&self, league_id: &str) -> Result<Vec<Game>, AppError> {
        let games = self.games.read().await;
        let mut league_games: Vec<Game> = games
            .values()
            .filter(|game| game.league_id == league_id)
            .cloned()
            .collect();
        Game::order_chronologically(&mut league_games);

        debug!(league_id = %league_id, game_count = league_games.len(), "Loaded league games");
        Ok(league_games)
    }
}

/// PostgreSQL implementation of game repository
///
/// Expects a `games` table with columns `id`, `league_id`, `competitor_a`,
/// `competitor_b`, `winning_id`, `losing_id`, `redemption` and `date`.
pub struct PostgresGameRepository {
    pool: PgPool,
}

impl PostgresGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn game_from_row(row: &PgRow) -> Result<Game, sqlx::Error> {
    Ok(Game {
        id: row.try_get("id")?,
        league_id: row.try_get("league_id")?,
        competitor_ids: [row.try_get("competitor_a")?, row.try_get("competitor_b")?],
        winning_id: row.try_get("winning_id")?,
        losing_id: row.try_get("losing_id")?,
        redemption: row.try_get("redemption")?,
        date: row.try_get("date")?,
    })
}

fn database_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Game query failed");
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    #[instrument(skip(self, game))]
    async fn create_game(&self, game: &Game) -> Result<(), AppError> {
        debug!(game_id = %game.id, "Creating game in database");

        sqlx::query(
            "INSERT INTO games (id, league_id, competitor_a, competitor_b, winning_id, losing_id, redemption, date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&game.id)
        .bind(&game.league_id)
        .bind(&game.competitor_ids[0])
        .bind(&game.competitor_ids[1])
        .bind(&game.winning_id)
        .bind(&game.losing_id)
        .bind(game.redemption)
        .bind(game.date)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError> {
        let row = sqlx::query(
            "SELECT id, league_id, competitor_a, competitor_b, winning_id, losing_id, redemption, date FROM games WHERE id = $1",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref()
            .map(game_from_row)
            .transpose()
            .map_err(database_error)
    }

    #[instrument(skip(self, game))]
    async fn save_game(&self, game: &Game) -> Result<(), AppError> {
        debug!(game_id = %game.id, played = game.is_played(), "Saving game in database");

        let result = sqlx::query(
            "UPDATE games SET winning_id = $2, losing_id = $3, redemption = $4, date = $5 WHERE id = $1",
        )
        .bind(&game.id)
        .bind(&game.winning_id)
        .bind(&game.losing_id)
        .bind(game.redemption)
        .bind(game.date)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Game not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_games_for_league(&self, league_id: &str) -> Result<Vec<Game>, AppError> {
        let rows = sqlx::query(
            "SELECT id, league_id, competitor_a, competitor_b, winning_id, losing_id, redemption, date FROM games WHERE league_id = $1 ORDER BY date ASC, id ASC",
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter()
            .map(game_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(database_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn game_at(league_id: &str, id: &str, hours: i64) -> Game {
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut game = Game::new(
            league_id.to_string(),
            ["a".to_string(), "b".to_string()],
            base + Duration::hours(hours),
        );
        game.id = id.to_string();
        game
    }

    #[tokio::test]
    async fn loads_league_games_in_chronological_order() {
        let repo = InMemoryGameRepository::new();
        repo.create_game(&game_at("league", "g3", 5)).await.unwrap();
        repo.create_game(&game_at("league", "g2", 1)).await.unwrap();
        repo.create_game(&game_at("league", "g1", 1)).await.unwrap();
        repo.create_game(&game_at("other", "x1", 0)).await.unwrap();

        let games = repo.load_games_for_league("league").await.unwrap();
        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g2", "g3"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_game() {
        let repo = InMemoryGameRepository::new();
        let game = game_at("league", "g1", 0);

        repo.create_game(&game).await.unwrap();
        let result = repo.create_game(&game).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn save_overwrites_result_fields() {
        let repo = InMemoryGameRepository::new();
        let game = game_at("league", "g1", 0);
        repo.create_game(&game).await.unwrap();

        let played = game.with_result("a", "b", true, game.date);
        repo.save_game(&played).await.unwrap();

        let stored = repo.get_game("g1").await.unwrap().unwrap();
        assert_eq!(stored.result(), Some(("a", "b")));
        assert!(stored.redemption);
    }

    #[tokio::test]
    async fn save_unknown_game_is_not_found() {
        let repo = InMemoryGameRepository::new();
        let result = repo.save_game(&game_at("league", "ghost", 0)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
