use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::jwt::TokenService;
use crate::{error::AppError, state::AppState};

/// The authenticated caller of the current request, as a user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Reads `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("invalid Authorization header"))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized("invalid auth scheme"))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::unauthorized("invalid auth scheme"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("missing bearer token"));
    }
    Ok(token)
}

/// Validates the bearer token and resolves the caller.
pub fn authenticate(tokens: &dyn TokenService, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::unauthorized("invalid or expired token")
    })?;
    Ok(AuthUser(claims.sub))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_auth` for this request.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }
        authenticate(state.tokens.as_ref(), &parts.headers)
    }
}

/// Rejects unauthenticated requests for a whole route group.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(state.tokens.as_ref(), req.headers())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
