use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::stats::StatRecord;

/// Teams and players are handled identically; the kind is informational.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompetitorKind {
    #[default]
    Team,
    Player,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: String,
    pub league_id: String,
    pub name: String,
    pub kind: CompetitorKind,
    /// User who registered the competitor, if any
    pub owner_id: Option<String>,
}

impl Competitor {
    /// Creates a new competitor with a generated ID
    pub fn new(
        league_id: String,
        name: String,
        kind: CompetitorKind,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            league_id,
            name,
            kind,
            owner_id,
        }
    }
}

/// A competitor paired with its current statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub competitor: Competitor,
    pub stats: StatRecord,
}

impl Standing {
    /// Sorts by wins descending, then losses ascending, then name.
    pub fn rank(standings: &mut [Standing]) {
        standings.sort_by(|a, b| {
            b.stats
                .wins
                .cmp(&a.stats.wins)
                .then_with(|| a.stats.losses.cmp(&b.stats.losses))
                .then_with(|| a.competitor.name.cmp(&b.competitor.name))
        });
    }
}
