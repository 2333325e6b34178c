use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running statistics for one competitor.
///
/// Derived data only: every field is reproducible by replaying the
/// competitor's played games, oldest first, through
/// [`apply_win`](super::apply_win) / [`apply_loss`](super::apply_loss)
/// starting from [`StatRecord::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRecord {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Positive while winning, negative while losing, zero before the first game
    pub streak: i32,
    pub hottest: i32,
    /// Date of the game that ended the record hot streak, `None` while it runs
    pub hottest_end: Option<DateTime<Utc>>,
    pub coldest: i32,
    pub coldest_end: Option<DateTime<Utc>>,
    pub redemptions_given: u32,
    #[serde(alias = "redemptionsEarned")]
    pub redemptions_had: u32,
}

impl StatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
