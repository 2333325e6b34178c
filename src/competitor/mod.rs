// Public API - what other modules can use
pub use handlers::{create_competitor, delete_competitor};
pub use models::{Competitor, CompetitorKind, Standing};
pub use service::CompetitorService;
pub use types::CreateCompetitorRequest;

// Internal modules
mod handlers;
mod models;
pub mod repository;
mod service;
mod types;
