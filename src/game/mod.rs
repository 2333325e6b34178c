// Public API
pub use handlers::{create_game, record_result, recompute_league};
pub use locks::LeagueLocks;
pub use models::Game;
pub use service::GameResultService;
pub use types::{CreateGameRequest, RecordResultRequest, RecordResultResponse, ResultFields};

// Internal modules
mod handlers;
mod locks;
mod models;
pub mod repository;
mod service;
mod types;
