use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use streakboard::{
    competitor::{repository::CompetitorRepository, Competitor},
    game::repository::GameRepository,
    AppError, Game, StatRecord,
};

// ============================================================================
// Counting wrappers: delegate to a real repository and record calls
// ============================================================================

pub struct CountingGameRepository {
    inner: Arc<dyn GameRepository>,
    league_loads: AtomicUsize,
}

impl CountingGameRepository {
    pub fn new(inner: Arc<dyn GameRepository>) -> Self {
        Self {
            inner,
            league_loads: AtomicUsize::new(0),
        }
    }

    pub fn league_loads(&self) -> usize {
        self.league_loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameRepository for CountingGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), AppError> {
        self.inner.create_game(game).await
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, AppError> {
        self.inner.get_game(game_id).await
    }

    async fn save_game(&self, game: &Game) -> Result<(), AppError> {
        self.inner.save_game(game).await
    }

    async fn load_games_for_league(&self, league_id: &str) -> Result<Vec<Game>, AppError> {
        self.league_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_games_for_league(league_id).await
    }
}

pub struct CountingCompetitorRepository {
    inner: Arc<dyn CompetitorRepository>,
    written: RwLock<Vec<String>>,
}

impl CountingCompetitorRepository {
    pub fn new(inner: Arc<dyn CompetitorRepository>) -> Self {
        Self {
            inner,
            written: RwLock::new(Vec::new()),
        }
    }

    /// Competitor ids whose StatRecord was written, in write order
    pub async fn written(&self) -> Vec<String> {
        self.written.read().await.clone()
    }

    pub async fn clear(&self) {
        self.written.write().await.clear();
    }
}

#[async_trait]
impl CompetitorRepository for CountingCompetitorRepository {
    async fn create_competitor(&self, competitor: &Competitor) -> Result<(), AppError> {
        self.inner.create_competitor(competitor).await
    }

    async fn get_competitor(&self, competitor_id: &str) -> Result<Option<Competitor>, AppError> {
        self.inner.get_competitor(competitor_id).await
    }

    async fn list_competitors(&self, league_id: &str) -> Result<Vec<Competitor>, AppError> {
        self.inner.list_competitors(league_id).await
    }

    async fn delete_competitor(&self, competitor_id: &str) -> Result<(), AppError> {
        self.inner.delete_competitor(competitor_id).await
    }

    async fn load_stat_record(&self, competitor_id: &str) -> Result<StatRecord, AppError> {
        self.inner.load_stat_record(competitor_id).await
    }

    async fn save_stat_record(
        &self,
        competitor_id: &str,
        record: &StatRecord,
    ) -> Result<(), AppError> {
        self.written.write().await.push(competitor_id.to_string());
        self.inner.save_stat_record(competitor_id, record).await
    }

    async fn save_stat_records(
        &self,
        records: &HashMap<String, StatRecord>,
    ) -> Result<(), AppError> {
        self.written
            .write()
            .await
            .extend(records.keys().cloned());
        self.inner.save_stat_records(records).await
    }
}
