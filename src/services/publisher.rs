use std::sync::Arc;

use crate::schema::{Event, PublishedEvent};
use crate::services::post_processor::PublishedEventPostProcessor;
use crate::services::pubsub_client::{PubSubClient, PubSubMessage};

pub const EVENT_ID_ATTRIBUTE: &str = "eventId";
pub const EVENT_TYPE_ATTRIBUTE: &str = "eventType";

#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Never fails: publish errors are reported through [`PublishedEvent::failed`].
    async fn publish_event(&self, event: Event) -> PublishedEvent;
}

pub struct PubSubEventPublisher {
    client: Arc<PubSubClient>,
    topic: String,
    post_processor: Arc<dyn PublishedEventPostProcessor>,
}

impl PubSubEventPublisher {
    pub fn new(
        client: Arc<PubSubClient>,
        topic: impl Into<String>,
        post_processor: Arc<dyn PublishedEventPostProcessor>,
    ) -> Self {
        Self {
            client,
            topic: topic.into(),
            post_processor,
        }
    }

    async fn send(&self, event: &Event) -> PublishedEvent {
        let message = match to_pubsub_message(event) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(event_id = %event.id, error = %e, "unable to serialize event");
                return PublishedEvent::failed(e.to_string());
            }
        };

        match self.client.publish(&self.topic, &message).await {
            Ok(message_id) => {
                tracing::info!(
                    event_id = %event.id,
                    event_type = %event.kind,
                    topic = %self.topic,
                    message_id = %message_id,
                    "Pub/Sub message published"
                );
                PublishedEvent::published(message_id)
            }
            Err(e) => {
                tracing::error!(
                    event_id = %event.id,
                    event_type = %event.kind,
                    topic = %self.topic,
                    error = %e,
                    "unable to publish Pub/Sub message"
                );
                PublishedEvent::failed(e.to_string())
            }
        }
    }
}

#[async_trait::async_trait]
impl EventPublisher for PubSubEventPublisher {
    async fn publish_event(&self, event: Event) -> PublishedEvent {
        let outcome = self.send(&event).await;

        match self.post_processor.process(&event, outcome.clone()).await {
            Ok(processed) => processed,
            Err(e) => {
                tracing::error!(event_id = %event.id, error = %e, "post-processing failed");
                outcome
            }
        }
    }
}

fn to_pubsub_message(event: &Event) -> anyhow::Result<PubSubMessage> {
    let data = serde_json::to_vec(event)?;
    Ok(PubSubMessage::new(data)
        .with_attribute(EVENT_ID_ATTRIBUTE, event.id.as_str())
        .with_attribute(EVENT_TYPE_ATTRIBUTE, event.kind.as_str()))
}
