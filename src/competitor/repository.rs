use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::models::{Competitor, CompetitorKind};
use crate::shared::AppError;
use crate::stats::StatRecord;

/// Trait for competitor repository operations
///
/// Each competitor owns exactly one StatRecord; the two are created and
/// deleted together.
#[async_trait]
pub trait CompetitorRepository: Send + Sync {
    /// Stores the competitor together with a zeroed StatRecord
    async fn create_competitor(&self, competitor: &Competitor) -> Result<(), AppError>;
    async fn get_competitor(&self, competitor_id: &str) -> Result<Option<Competitor>, AppError>;
    async fn list_competitors(&self, league_id: &str) -> Result<Vec<Competitor>, AppError>;
    /// Removes the competitor and its StatRecord
    async fn delete_competitor(&self, competitor_id: &str) -> Result<(), AppError>;

    async fn load_stat_record(&self, competitor_id: &str) -> Result<StatRecord, AppError>;
    async fn save_stat_record(
        &self,
        competitor_id: &str,
        record: &StatRecord,
    ) -> Result<(), AppError>;
    /// Writes every record or none of them
    async fn save_stat_records(&self, records: &HashMap<String, StatRecord>)
        -> Result<(), AppError>;
}

#[derive(Debug, Default)]
struct CompetitorTables {
    competitors: HashMap<String, Competitor>,
    records: HashMap<String, StatRecord>,
}

/// In-memory implementation of CompetitorRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryCompetitorRepository {
    tables: RwLock<CompetitorTables>,
}

impl InMemoryCompetitorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn stat_record_missing(competitor_id: &str) -> AppError {
    AppError::NotFound(format!("No statistics for competitor {}", competitor_id))
}

#[async_trait]
impl CompetitorRepository for InMemoryCompetitorRepository {
    #[instrument(skip(self, competitor))]
    async fn create_competitor(&self, competitor: &Competitor) -> Result<(), AppError> {
        debug!(competitor_id = %competitor.id, name = %competitor.name, "Creating competitor in memory");

        let mut tables = self.tables.write().await;
        if tables.competitors.contains_key(&competitor.id) {
            warn!(competitor_id = %competitor.id, "Competitor already exists in memory");
            return Err(AppError::DatabaseError(
                "Competitor already exists".to_string(),
            ));
        }
        tables
            .competitors
            .insert(competitor.id.clone(), competitor.clone());
        tables
            .records
            .insert(competitor.id.clone(), StatRecord::default());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_competitor(&self, competitor_id: &str) -> Result<Option<Competitor>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.competitors.get(competitor_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_competitors(&self, league_id: &str) -> Result<Vec<Competitor>, AppError> {
        let tables = self.tables.read().await;
        let mut competitors: Vec<Competitor> = tables
            .competitors
            .values()
            .filter(|c| c.league_id == league_id)
            .cloned()
            .collect();
        competitors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(competitors)
    }

    #[instrument(skip(self))]
    async fn delete_competitor(&self, competitor_id: &str) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.competitors.remove(competitor_id).is_none() {
            warn!(competitor_id = %competitor_id, "Competitor not found for deletion in memory");
            return Err(AppError::NotFound("Competitor not found".to_string()));
        }
        tables.records.remove(competitor_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_stat_record(&self, competitor_id: &str) -> Result<StatRecord, AppError> {
        let tables = self.tables.read().await;
        tables
            .records
            .get(competitor_id)
            .cloned()
            .ok_or_else(|| stat_record_missing(competitor_id))
    }

    #[instrument(skip(self, record))]
    async fn save_stat_record(
        &self,
        competitor_id: &str,
        record: &StatRecord,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        match tables.records.get_mut(competitor_id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(stat_record_missing(competitor_id)),
        }
    }

    #[instrument(skip(self, records), fields(record_count = records.len()))]
    async fn save_stat_records(
        &self,
        records: &HashMap<String, StatRecord>,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;

        if let Some(missing) = records.keys().find(|id| !tables.records.contains_key(*id)) {
            warn!(competitor_id = %missing, "Refusing batch write with unknown competitor");
            return Err(stat_record_missing(missing));
        }

        for (id, record) in records {
            tables.records.insert(id.clone(), record.clone());
        }

        debug!(record_count = records.len(), "Stat records overwritten in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of competitor repository
///
/// Uses a `competitors` table and a `stat_records` table keyed by
/// `competitor_id`. Multi-row writes run in one transaction.
pub struct PostgresCompetitorRepository {
    pool: PgPool,
}

impl PostgresCompetitorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn competitor_from_row(row: &PgRow) -> Result<Competitor, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    let kind = CompetitorKind::from_str(&kind).map_err(|e| sqlx::Error::ColumnDecode {
        index: "kind".to_string(),
        source: Box::new(e),
    })?;

    Ok(Competitor {
        id: row.try_get("id")?,
        league_id: row.try_get("league_id")?,
        name: row.try_get("name")?,
        kind,
        owner_id: row.try_get("owner_id")?,
    })
}

fn stat_record_from_row(row: &PgRow) -> Result<StatRecord, sqlx::Error> {
    Ok(StatRecord {
        games: row.try_get::<i32, _>("games")? as u32,
        wins: row.try_get::<i32, _>("wins")? as u32,
        losses: row.try_get::<i32, _>("losses")? as u32,
        streak: row.try_get("streak")?,
        hottest: row.try_get("hottest")?,
        hottest_end: row.try_get("hottest_end")?,
        coldest: row.try_get("coldest")?,
        coldest_end: row.try_get("coldest_end")?,
        redemptions_given: row.try_get::<i32, _>("redemptions_given")? as u32,
        redemptions_had: row.try_get::<i32, _>("redemptions_had")? as u32,
    })
}

const UPSERT_STAT_RECORD: &str = "INSERT INTO stat_records (competitor_id, games, wins, losses, streak, hottest, hottest_end, coldest, coldest_end, redemptions_given, redemptions_had) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
     ON CONFLICT (competitor_id) DO UPDATE SET games = $2, wins = $3, losses = $4, streak = $5, hottest = $6, hottest_end = $7, coldest = $8, coldest_end = $9, redemptions_given = $10, redemptions_had = $11";

fn bind_stat_record<'q>(
    competitor_id: &'q str,
    record: &'q StatRecord,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(UPSERT_STAT_RECORD)
        .bind(competitor_id)
        .bind(record.games as i32)
        .bind(record.wins as i32)
        .bind(record.losses as i32)
        .bind(record.streak)
        .bind(record.hottest)
        .bind(record.hottest_end)
        .bind(record.coldest)
        .bind(record.coldest_end)
        .bind(record.redemptions_given as i32)
        .bind(record.redemptions_had as i32)
}

fn database_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Competitor query failed");
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl CompetitorRepository for PostgresCompetitorRepository {
    #[instrument(skip(self, competitor))]
    async fn create_competitor(&self, competitor: &Competitor) -> Result<(), AppError> {
        debug!(competitor_id = %competitor.id, "Creating competitor in database");

        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            "INSERT INTO competitors (id, league_id, name, kind, owner_id) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&competitor.id)
        .bind(&competitor.league_id)
        .bind(&competitor.name)
        .bind(competitor.kind.to_string())
        .bind(&competitor.owner_id)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        let zero = StatRecord::default();
        bind_stat_record(&competitor.id, &zero)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_competitor(&self, competitor_id: &str) -> Result<Option<Competitor>, AppError> {
        let row = sqlx::query(
            "SELECT id, league_id, name, kind, owner_id FROM competitors WHERE id = $1",
        )
        .bind(competitor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref()
            .map(competitor_from_row)
            .transpose()
            .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn list_competitors(&self, league_id: &str) -> Result<Vec<Competitor>, AppError> {
        let rows = sqlx::query(
            "SELECT id, league_id, name, kind, owner_id FROM competitors WHERE league_id = $1 ORDER BY id",
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter()
            .map(competitor_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn delete_competitor(&self, competitor_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query("DELETE FROM stat_records WHERE competitor_id = $1")
            .bind(competitor_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let result = sqlx::query("DELETE FROM competitors WHERE id = $1")
            .bind(competitor_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            // dropping the transaction rolls it back
            return Err(AppError::NotFound("Competitor not found".to_string()));
        }

        tx.commit().await.map_err(database_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_stat_record(&self, competitor_id: &str) -> Result<StatRecord, AppError> {
        let row = sqlx::query(
            "SELECT games, wins, losses, streak, hottest, hottest_end, coldest, coldest_end, redemptions_given, redemptions_had FROM stat_records WHERE competitor_id = $1",
        )
        .bind(competitor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match row {
            Some(row) => stat_record_from_row(&row).map_err(database_error),
            None => Err(stat_record_missing(competitor_id)),
        }
    }

    #[instrument(skip(self, record))]
    async fn save_stat_record(
        &self,
        competitor_id: &str,
        record: &StatRecord,
    ) -> Result<(), AppError> {
        bind_stat_record(competitor_id, record)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }

    #[instrument(skip(self, records), fields(record_count = records.len()))]
    async fn save_stat_records(
        &self,
        records: &HashMap<String, StatRecord>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        for (id, record) in records {
            bind_stat_record(id, record)
                .execute(&mut *tx)
                .await
                .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;
        info!(record_count = records.len(), "Stat records overwritten in database");
        Ok(())
    }
}
