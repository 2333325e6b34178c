// Public API - what other modules can use
pub use access::{authorize, is_visible, is_writable, AccessMode};
pub use handlers::{create_league, get_league, get_standings};
pub use models::{Actor, League};
pub use service::{load_authorized_league, LeagueService};
pub use types::CreateLeagueRequest;

// Internal modules
mod access;
mod handlers;
mod models;
pub mod repository;
mod service;
mod types;
