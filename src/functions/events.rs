use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::schema::{EventMessage, PublishedEvent, RequestEvent};

/// `POST /events`. Publish failures are reported in the body, the status is always 200.
pub async fn publish_event(
    State(state): State<AppState>,
    Json(request): Json<RequestEvent>,
) -> Json<PublishedEvent> {
    let event = request.into_event();
    tracing::debug!(event_id = %event.id, event_type = %event.kind, "event received");
    Json(state.publisher.publish_event(event).await)
}

/// `GET /events/{id}`
pub async fn get_event_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventMessage>, ApiError> {
    let uuid = Uuid::parse_str(&id).map_err(|_| ApiError::InvalidId(id.clone()))?;
    state
        .repository
        .find_by_id(uuid)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}
