use std::sync::Arc;

use chrono::Utc;

use crate::schema::{Event, EventMessage, PublishedEvent};
use crate::services::repository::EventMessageRepository;

#[async_trait::async_trait]
pub trait PublishedEventPostProcessor: Send + Sync {
    async fn process(
        &self,
        event: &Event,
        outcome: PublishedEvent,
    ) -> anyhow::Result<PublishedEvent>;
}

/// Records every publish attempt in `event_messages` and passes the outcome through.
pub struct AuditPostProcessor {
    repository: Arc<dyn EventMessageRepository>,
}

impl AuditPostProcessor {
    pub fn new(repository: Arc<dyn EventMessageRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl PublishedEventPostProcessor for AuditPostProcessor {
    async fn process(
        &self,
        event: &Event,
        outcome: PublishedEvent,
    ) -> anyhow::Result<PublishedEvent> {
        let message = EventMessage::from_outcome(event, &outcome, Utc::now())?;
        self.repository.save(&message).await?;
        tracing::debug!(event_id = %message.id, message_id = ?message.message_id, "event message saved");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repository::testing::InMemoryEventMessageRepository;
    use uuid::Uuid;

    fn event() -> Event {
        Event {
            id: Uuid::new_v4().to_string(),
            kind: "TEST_EVENT_TYPE".to_string(),
            payload: r#"{"key":"value"}"#.to_string(),
        }
    }

    #[tokio::test]
    async fn saves_audit_row_for_successful_publish() {
        let repo = Arc::new(InMemoryEventMessageRepository::default());
        let processor = AuditPostProcessor::new(repo.clone());
        let event = event();

        processor
            .process(&event, PublishedEvent::published("test-message-id-123"))
            .await
            .unwrap();

        let rows = repo.rows();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.id.to_string(), event.id);
        assert_eq!(row.event_type, "TEST_EVENT_TYPE");
        assert_eq!(row.message_id.as_deref(), Some("test-message-id-123"));
        assert_eq!(row.created, row.modified);
        assert_eq!(row.event_data["payload"], r#"{"key":"value"}"#);
    }

    #[tokio::test]
    async fn returns_the_outcome_it_was_given() {
        let repo = Arc::new(InMemoryEventMessageRepository::default());
        let processor = AuditPostProcessor::new(repo.clone());
        let outcome = PublishedEvent {
            success: false,
            message_id: Some("error-message-id".to_string()),
            error_reason: Some("Some error occurred".to_string()),
        };

        let result = processor.process(&event(), outcome.clone()).await.unwrap();

        assert_eq!(result, outcome);
        assert_eq!(repo.rows().len(), 1);
    }

    #[tokio::test]
    async fn repository_failure_is_an_error() {
        let repo = Arc::new(InMemoryEventMessageRepository::unavailable());
        let processor = AuditPostProcessor::new(repo);

        let err = processor
            .process(&event(), PublishedEvent::published("m"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn non_uuid_id_is_not_persisted() {
        let repo = Arc::new(InMemoryEventMessageRepository::default());
        let processor = AuditPostProcessor::new(repo.clone());
        let mut event = event();
        event.id = "test-event-id-123".to_string();

        assert!(
            processor
                .process(&event, PublishedEvent::published("m"))
                .await
                .is_err()
        );
        assert!(repo.rows().is_empty());
    }
}
