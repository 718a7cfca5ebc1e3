use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event as accepted on `POST /events`. The id is optional and assigned by
/// [`RequestEvent::into_event`] when missing or empty. A missing or null
/// payload becomes the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<String>,
}

impl RequestEvent {
    pub fn into_event(self) -> Event {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };
        Event {
            id,
            kind: self.kind,
            payload: self.payload.unwrap_or_default(),
        }
    }
}

/// Event with its id settled. This is also the JSON body of the Pub/Sub message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: String,
}

/// Outcome of a publish attempt. `message_id` is set on success,
/// `error_reason` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedEvent {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

impl PublishedEvent {
    pub fn published(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error_reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_existing_id() {
        let event = RequestEvent {
            id: Some("abc".to_string()),
            kind: "order.created".to_string(),
            payload: Some("{}".to_string()),
        }
        .into_event();
        assert_eq!(event.id, "abc");
        assert_eq!(event.payload, "{}");
        assert_eq!(event.kind, "order.created");
    }

    #[test]
    fn assigns_uuid_for_missing_or_empty_id() {
        for id in [None, Some(String::new())] {
            let event = RequestEvent {
                id,
                kind: "t".to_string(),
                payload: None,
            }
            .into_event();
            assert!(Uuid::parse_str(&event.id).is_ok(), "not a uuid: {}", event.id);
        }
    }

    #[test]
    fn deserializes_without_id() {
        let req: RequestEvent =
            serde_json::from_str(r#"{"type":"test-event","payload":"{\"key\":\"value\"}"}"#)
                .unwrap();
        assert_eq!(req.id, None);
        assert_eq!(req.kind, "test-event");
        assert_eq!(req.payload.as_deref(), Some(r#"{"key":"value"}"#));
    }

    #[test]
    fn null_or_missing_payload_becomes_empty() {
        for body in [r#"{"type":"t","payload":null}"#, r#"{"type":"t"}"#] {
            let req: RequestEvent = serde_json::from_str(body).unwrap();
            assert_eq!(req.payload, None);
            assert_eq!(req.into_event().payload, "");
        }
    }

    #[test]
    fn event_serializes_with_type_key() {
        let event = Event {
            id: "1".to_string(),
            kind: "k".to_string(),
            payload: "p".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "1", "type": "k", "payload": "p" }));
    }

    #[test]
    fn published_outcome_omits_error_reason() {
        let json = serde_json::to_value(PublishedEvent::published("m-1")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "messageId": "m-1" }));
    }

    #[test]
    fn failed_outcome_omits_message_id() {
        let json = serde_json::to_value(PublishedEvent::failed("Topic not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "errorReason": "Topic not found" })
        );
    }
}
