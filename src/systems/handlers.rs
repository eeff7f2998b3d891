use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateSystemRequest, UpdateSystemRequest, UpdateStatusRequest},
    repo_types::System,
};
use crate::{error::AppError, state::AppState};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/systems", get(list_systems).post(create_system))
        .route(
            "/systems/:id",
            get(get_system).patch(update_system).delete(delete_system),
        )
        .route("/systems/:id/status", patch(update_status))
        .route("/systems/category/:category", get(list_by_category))
        .route("/systems/status/:status", get(list_by_status))
        .route("/systems/access-level/:access_level", get(list_by_access_level))
}

#[instrument(skip(state, payload))]
pub async fn create_system(
    State(state): State<AppState>,
    payload: Result<Json<CreateSystemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<System>), AppError> {
    let Json(payload) = payload?;
    let system = state.systems.create(payload).await?;
    Ok((StatusCode::CREATED, Json(system)))
}

#[instrument(skip(state))]
pub async fn list_systems(State(state): State<AppState>) -> Result<Json<Vec<System>>, AppError> {
    Ok(Json(state.systems.find_all().await?))
}

#[instrument(skip(state))]
pub async fn get_system(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<System>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.systems.find_one(id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_system(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateSystemRequest>, JsonRejection>,
) -> Result<Json<System>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.systems.update(id, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<System>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.systems.update_status(id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_system(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.systems.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<System>>, AppError> {
    Ok(Json(state.systems.find_by_category(&category).await?))
}

#[instrument(skip(state))]
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<System>>, AppError> {
    Ok(Json(state.systems.find_by_status(&status).await?))
}

#[instrument(skip(state))]
pub async fn list_by_access_level(
    State(state): State<AppState>,
    Path(access_level): Path<String>,
) -> Result<Json<Vec<System>>, AppError> {
    Ok(Json(state.systems.find_by_access_level(&access_level).await?))
}
