use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use super::types::CurrentActor;
use crate::shared::{AppError, AppState};

/// Resolves the optional `Authorization: Bearer` header into a [`CurrentActor`].
///
/// Requests without the header continue anonymously; a header that is present
/// but malformed or carries an invalid token is rejected.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), auth::resolve_actor))
#[instrument(skip(state, req, next))]
pub async fn resolve_actor(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .map(|header| header.to_str())
        .transpose()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    let actor = match auth_header {
        None => {
            debug!(uri = %req.uri(), "Anonymous request");
            None
        }
        Some(value) => {
            let token = value.strip_prefix("Bearer ").ok_or_else(|| {
                warn!("Invalid Authorization header format (expected Bearer token)");
                AppError::Unauthorized("Invalid authorization header format".to_string())
            })?;

            let claims = state.token_config.validate_token(token).map_err(|e| {
                warn!("JWT authentication failed: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?;

            debug!(user_id = %claims.sub, admin = claims.admin, "Resolved actor from token");
            Some(claims.actor())
        }
    };

    req.extensions_mut().insert(CurrentActor(actor));
    Ok(next.run(req).await)
}
