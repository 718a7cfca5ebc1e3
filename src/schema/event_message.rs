use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::{Event, PublishedEvent};

/// Audit row in `event_messages`, one per publish attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub id: Uuid,
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub message_id: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl EventMessage {
    pub fn from_outcome(
        event: &Event,
        outcome: &PublishedEvent,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let id = Uuid::parse_str(&event.id)
            .map_err(|e| anyhow::anyhow!("event id {:?} is not a uuid: {e}", event.id))?;

        Ok(Self {
            id,
            event_type: event.kind.clone(),
            event_data: serde_json::json!({
                "id": event.id,
                "type": event.kind,
                "payload": event.payload,
            }),
            message_id: outcome.message_id.clone(),
            created: now,
            modified: now,
        })
    }
}
