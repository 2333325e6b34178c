mod models;
pub mod recompute;
mod streak;

pub use models::StatRecord;
pub use recompute::{replay, LeagueRecomputer};
pub use streak::{apply_loss, apply_win, fold_game};
