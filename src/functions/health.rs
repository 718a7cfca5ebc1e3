use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthView {
    pub status: &'static str,
    pub event_messages: i64,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthView>, ApiError> {
    let event_messages = state.repository.count().await?;
    Ok(Json(HealthView {
        status: "ok",
        event_messages,
    }))
}
