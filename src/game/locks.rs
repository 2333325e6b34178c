use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};
use tracing::{debug, warn};

use crate::shared::AppError;

/// One async mutex per league, serializing every stats write in that league.
#[derive(Clone)]
pub struct LeagueLocks {
    league_mutexes: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
    recompute_timeout: Duration,
}

impl LeagueLocks {
    pub fn new(recompute_timeout: Duration) -> Self {
        Self {
            league_mutexes: Arc::new(RwLock::new(HashMap::new())),
            recompute_timeout,
        }
    }

    /// Waits for the league's lock without a deadline.
    pub async fn acquire(&self, league_id: &str) -> OwnedMutexGuard<()> {
        self.league_lock(league_id).await.lock_owned().await
    }

    /// Waits at most the recompute timeout, then gives up with `RecomputeConflict`.
    pub async fn acquire_for_recompute(
        &self,
        league_id: &str,
    ) -> Result<OwnedMutexGuard<()>, AppError> {
        let lock = self.league_lock(league_id).await;

        match tokio::time::timeout(self.recompute_timeout, lock.lock_owned()).await {
            Ok(guard) => {
                debug!(league_id = %league_id, "Acquired league lock for recompute");
                Ok(guard)
            }
            Err(_) => {
                warn!(
                    league_id = %league_id,
                    timeout_ms = self.recompute_timeout.as_millis() as u64,
                    "League is busy, rejecting recompute"
                );
                Err(AppError::RecomputeConflict(format!(
                    "A statistics update for league {} is already in progress, retry later",
                    league_id
                )))
            }
        }
    }

    async fn league_lock(&self, league_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.league_mutexes.read().await;
            if let Some(lock) = guard.get(league_id) {
                return lock.clone();
            }
        }

        let mut guard = self.league_mutexes.write().await;
        guard
            .entry(league_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
