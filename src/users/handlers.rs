use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::dto::UserResponse;
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/users/profile", get(get_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.find_by_id(user_id).await?;
    Ok(Json(user.into()))
}
