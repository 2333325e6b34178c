// Public API - what other modules can use
pub use middleware::resolve_actor;
pub use token::TokenConfig;
pub use types::{ActorClaims, CurrentActor};

// Internal modules
mod middleware;
mod token;
mod types;
