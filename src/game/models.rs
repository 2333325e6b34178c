use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled or played game between exactly two competitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub league_id: String,
    pub competitor_ids: [String; 2],
    pub winning_id: Option<String>,
    pub losing_id: Option<String>,
    pub redemption: bool,
    pub date: DateTime<Utc>,
}

impl Game {
    /// Creates an unplayed game with a generated ID
    pub fn new(league_id: String, competitor_ids: [String; 2], date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            league_id,
            competitor_ids,
            winning_id: None,
            losing_id: None,
            redemption: false,
            date,
        }
    }

    /// Winner and loser ids, present only once both are recorded
    pub fn result(&self) -> Option<(&str, &str)> {
        match (&self.winning_id, &self.losing_id) {
            (Some(winner), Some(loser)) => Some((winner.as_str(), loser.as_str())),
            _ => None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.result().is_some()
    }

    pub fn involves(&self, competitor_id: &str) -> bool {
        self.competitor_ids.iter().any(|id| id == competitor_id)
    }

    /// Returns a copy of this game carrying the given result.
    pub fn with_result(
        &self,
        winner_id: &str,
        loser_id: &str,
        redemption: bool,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            winning_id: Some(winner_id.to_string()),
            losing_id: Some(loser_id.to_string()),
            redemption,
            date,
            ..self.clone()
        }
    }

    fn chronological_key(&self) -> (DateTime<Utc>, &str) {
        (self.date, self.id.as_str())
    }

    /// Whether this game replays after `other`.
    pub fn is_after(&self, other: &Game) -> bool {
        self.chronological_key() > other.chronological_key()
    }

    /// Sorts by `(date, id)` so replays are deterministic on equal timestamps.
    pub fn order_chronologically(games: &mut [Game]) {
        games.sort_by(|a, b| a.chronological_key().cmp(&b.chronological_key()));
    }
}
