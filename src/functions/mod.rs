use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use crate::services::publisher::EventPublisher;
use crate::services::repository::EventMessageRepository;

pub mod events;
pub mod health;

#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<dyn EventPublisher>,
    pub repository: Arc<dyn EventMessageRepository>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/events", post(events::publish_event))
        .route("/events/{id}", get(events::get_event_message))
        .route("/health", get(health::health))
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid event id: {0}")]
    InvalidId(String),
    #[error("event message not found: {0}")]
    NotFound(String),
    #[error("storage unavailable")]
    Unavailable(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Unavailable(e) = &self {
            tracing::error!(error = %format!("{e:#}"), "storage unavailable");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
