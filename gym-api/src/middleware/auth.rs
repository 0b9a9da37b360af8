use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{error::AppError, state::AppState};

/// Token gate for the protected routes.
///
/// Validates the bearer token and inserts the resolved `gym_core::AuthUser` into the request
/// extensions, where handlers pick it up with `Extension<AuthUser>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::AuthenticationError("Token is missing".to_string()))?;

    // 2. Decode and validate JWT
    let user = state.identity.authenticate(bearer.token())?;

    // 3. Inject identity into request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
