use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::config::PubSubConfig;

/// A message as handed to the topic: raw bytes plus string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PubSubMessage {
    pub data: Vec<u8>,
    pub attributes: BTreeMap<String, String>,
}

impl PubSubMessage {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Serialize)]
struct PublishRequest {
    messages: Vec<WireMessage>,
}

#[derive(Serialize)]
struct WireMessage {
    data: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Thin client for the Pub/Sub REST API. Works against the local emulator
/// when the endpoint points at it.
pub struct PubSubClient {
    client: reqwest::Client,
    endpoint: String,
    project_id: String,
    access_token: Option<String>,
}

impl PubSubClient {
    pub fn new(config: &PubSubConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build reqwest client: {e}"))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Accepts `events` or `projects/<p>/topics/events`.
    pub fn topic_path(&self, topic: &str) -> String {
        if topic.starts_with("projects/") {
            topic.to_string()
        } else {
            format!("projects/{}/topics/{}", self.project_id, topic)
        }
    }

    pub async fn publish(&self, topic: &str, message: &PubSubMessage) -> anyhow::Result<String> {
        let url = format!("{}/v1/{}:publish", self.endpoint, self.topic_path(topic));
        let body = PublishRequest {
            messages: vec![WireMessage {
                data: BASE64.encode(&message.data),
                attributes: message.attributes.clone(),
            }],
        };

        let response = self.authorized(self.client.post(&url)).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!(api_error_message(status, &text));
        }

        let parsed: PublishResponse = response.json().await?;
        parsed
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Pub/Sub returned no message id"))
    }

    /// Creates the topic. An existing topic counts as success.
    pub async fn create_topic(&self, topic: &str) -> anyhow::Result<()> {
        let url = format!("{}/v1/{}", self.endpoint, self.topic_path(topic));
        let response = self
            .authorized(self.client.put(&url))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::CONFLICT {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        anyhow::bail!(api_error_message(status, &text))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => format!("Pub/Sub returned {status}"),
        Err(_) => format!("Pub/Sub returned {status}: {}", body.trim()),
    }
}
