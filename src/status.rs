use axum::{routing::get, Json, Router};
use serde::Serialize;
use time::OffsetDateTime;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(get_status))
}

pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        timestamp: OffsetDateTime::now_utc(),
        message: "Systems Portal API is running",
    })
}
