use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::Game;
use crate::shared::AppError;
use crate::stats::StatRecord;

/// Request payload for recording or correcting a game result
///
/// Every field is optional on the wire so that absent ones can be reported
/// together instead of failing on the first.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultRequest {
    pub winner_id: Option<String>,
    pub loser_id: Option<String>,
    pub redemption: Option<bool>,
    /// Defaults to the game's scheduled date
    pub date: Option<DateTime<Utc>>,
}

/// Validated result fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFields<'a> {
    pub winner_id: &'a str,
    pub loser_id: &'a str,
    pub redemption: bool,
}

impl RecordResultRequest {
    /// Returns the required fields or `MissingFields` naming each absent one.
    pub fn required_fields(&self) -> Result<ResultFields<'_>, AppError> {
        let mut missing = Vec::new();
        if self.winner_id.is_none() {
            missing.push("winnerId".to_string());
        }
        if self.loser_id.is_none() {
            missing.push("loserId".to_string());
        }
        if self.redemption.is_none() {
            missing.push("redemption".to_string());
        }

        match (&self.winner_id, &self.loser_id, self.redemption) {
            (Some(winner_id), Some(loser_id), Some(redemption)) => Ok(ResultFields {
                winner_id,
                loser_id,
                redemption,
            }),
            _ => Err(AppError::MissingFields(missing)),
        }
    }
}

/// Request payload for scheduling a game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub competitor_ids: Vec<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Response for a recorded result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultResponse {
    pub game: Game,
    /// True when the whole league was replayed instead of folded incrementally
    pub recomputed: bool,
    /// Every StatRecord written by this request, keyed by competitor id
    pub stats: HashMap<String, StatRecord>,
}
