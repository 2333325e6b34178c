use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::League;
use crate::shared::AppError;

/// Trait for league repository operations
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    async fn create_league(&self, league: &League) -> Result<(), AppError>;
    async fn load_league(&self, league_id: &str) -> Result<Option<League>, AppError>;
    /// Overwrites name, flags and the member/moderator sets
    async fn save_league(&self, league: &League) -> Result<(), AppError>;
}

/// In-memory implementation of LeagueRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryLeagueRepository {
    leagues: RwLock<HashMap<String, League>>,
}

impl InMemoryLeagueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory repository with pre-populated leagues
    pub fn with_leagues(leagues: Vec<League>) -> Self {
        let leagues = leagues
            .into_iter()
            .map(|league| (league.id.clone(), league))
            .collect();
        Self {
            leagues: RwLock::new(leagues),
        }
    }
}

#[async_trait]
impl LeagueRepository for InMemoryLeagueRepository {
    #[instrument(skip(self, league))]
    async fn create_league(&self, league: &League) -> Result<(), AppError> {
        debug!(league_id = %league.id, name = %league.name, "Creating league in memory");

        let mut leagues = self.leagues.write().await;
        if leagues.contains_key(&league.id) {
            warn!(league_id = %league.id, "League already exists in memory");
            return Err(AppError::DatabaseError("League already exists".to_string()));
        }
        leagues.insert(league.id.clone(), league.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_league(&self, league_id: &str) -> Result<Option<League>, AppError> {
        let leagues = self.leagues.read().await;
        let league = leagues.get(league_id).cloned();
        if league.is_none() {
            debug!(league_id = %league_id, "League not found in memory");
        }
        Ok(league)
    }

    #[instrument(skip(self, league))]
    async fn save_league(&self, league: &League) -> Result<(), AppError> {
        let mut leagues = self.leagues.write().await;
        match leagues.get_mut(&league.id) {
            Some(stored) => {
                *stored = league.clone();
                Ok(())
            }
            None => {
                warn!(league_id = %league.id, "League not found for update in memory");
                Err(AppError::NotFound("League not found".to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of league repository
///
/// Member and moderator sets are stored as `TEXT[]` columns on `leagues`.
pub struct PostgresLeagueRepository {
    pool: PgPool,
}

impl PostgresLeagueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn league_from_row(row: &PgRow) -> Result<League, sqlx::Error> {
    let members: Vec<String> = row.try_get("member_ids")?;
    let moderators: Vec<String> = row.try_get("moderator_ids")?;

    Ok(League {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        public: row.try_get("is_public")?,
        members_are_mods: row.try_get("members_are_mods")?,
        members: members.into_iter().collect(),
        moderators: moderators.into_iter().collect(),
    })
}

fn sorted(ids: &std::collections::HashSet<String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.iter().cloned().collect();
    ids.sort();
    ids
}

fn database_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "League query failed");
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl LeagueRepository for PostgresLeagueRepository {
    #[instrument(skip(self, league))]
    async fn create_league(&self, league: &League) -> Result<(), AppError> {
        debug!(league_id = %league.id, "Creating league in database");

        sqlx::query(
            "INSERT INTO leagues (id, name, is_public, members_are_mods, member_ids, moderator_ids) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&league.id)
        .bind(&league.name)
        .bind(league.public)
        .bind(league.members_are_mods)
        .bind(sorted(&league.members))
        .bind(sorted(&league.moderators))
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_league(&self, league_id: &str) -> Result<Option<League>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, is_public, members_are_mods, member_ids, moderator_ids FROM leagues WHERE id = $1",
        )
        .bind(league_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref()
            .map(league_from_row)
            .transpose()
            .map_err(database_error)
    }

    #[instrument(skip(self, league))]
    async fn save_league(&self, league: &League) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE leagues SET name = $2, is_public = $3, members_are_mods = $4, member_ids = $5, moderator_ids = $6 WHERE id = $1",
        )
        .bind(&league.id)
        .bind(&league.name)
        .bind(league.public)
        .bind(league.members_are_mods)
        .bind(sorted(&league.members))
        .bind(sorted(&league.moderators))
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("League not found".to_string()));
        }
        Ok(())
    }
}
