//! The fold rule shared by incremental updates and full recomputes.

use std::collections::HashMap;

use super::StatRecord;
use crate::game::Game;

/// Folds a win in `game` into `record`.
pub fn apply_win(record: &StatRecord, game: &Game) -> StatRecord {
    let mut next = record.clone();
    next.games += 1;
    next.wins += 1;

    if next.streak >= 0 {
        next.streak += 1;
        if next.streak > next.hottest {
            next.hottest = next.streak;
            next.hottest_end = None;
        }
    } else {
        if next.streak == next.coldest {
            next.coldest_end = Some(game.date);
        }
        next.streak = 1;
        // only reachable on a competitor's first ever win
        if next.streak > next.hottest {
            next.hottest = next.streak;
            next.hottest_end = None;
        }
    }

    if game.redemption {
        next.redemptions_given += 1;
    }

    next
}

/// Folds a loss in `game` into `record`.
pub fn apply_loss(record: &StatRecord, game: &Game) -> StatRecord {
    let mut next = record.clone();
    next.games += 1;
    next.losses += 1;

    if next.streak <= 0 {
        next.streak -= 1;
        if next.streak < next.coldest {
            next.coldest = next.streak;
            next.coldest_end = None;
        }
    } else {
        if next.streak == next.hottest {
            next.hottest_end = Some(game.date);
        }
        next.streak = -1;
        // only reachable on a competitor's first ever loss
        if next.streak < next.coldest {
            next.coldest = next.streak;
            next.coldest_end = None;
        }
    }

    if game.redemption {
        next.redemptions_had += 1;
    }

    next
}

/// Applies one game to a table of records keyed by competitor id.
///
/// Unplayed games leave the table untouched. Returns whether the game was applied.
pub fn fold_game(records: &mut HashMap<String, StatRecord>, game: &Game) -> bool {
    let Some((winner_id, loser_id)) = game.result() else {
        return false;
    };

    let winner = records.entry(winner_id.to_string()).or_default();
    *winner = apply_win(winner, game);

    let loser = records.entry(loser_id.to_string()).or_default();
    *loser = apply_loss(loser, game);

    true
}
