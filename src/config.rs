use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBSUB_ENDPOINT: &str = "https://pubsub.googleapis.com";
const DEFAULT_PUBSUB_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PubSubConfig {
    pub endpoint: String,
    pub project_id: String,
    pub topic: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub create_topic: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub pubsub: PubSubConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow::anyhow!("{key} not set"));

        let http_addr = get("BRIDGE_HTTP_ADDR")
            .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid BRIDGE_HTTP_ADDR: {e}"))?;

        let endpoint = match get("PUBSUB_EMULATOR_HOST") {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => host,
            Some(host) => format!("http://{host}"),
            None => get("PUBSUB_ENDPOINT").unwrap_or_else(|| DEFAULT_PUBSUB_ENDPOINT.to_string()),
        };

        let timeout_ms: u64 = parse_or(
            get("PUBSUB_TIMEOUT_MS"),
            "PUBSUB_TIMEOUT_MS",
            DEFAULT_PUBSUB_TIMEOUT_MS,
        )?;
        let create_topic: bool =
            parse_or(get("PUBSUB_CREATE_TOPIC"), "PUBSUB_CREATE_TOPIC", false)?;

        Ok(Self {
            http_addr,
            database_url: require("DATABASE_URL")?,
            database_max_connections: parse_or(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            pubsub: PubSubConfig {
                endpoint: endpoint.trim_end_matches('/').to_string(),
                project_id: require("PUBSUB_PROJECT_ID")?,
                topic: require("PUBSUB_TOPIC")?,
                access_token: get("PUBSUB_ACCESS_TOKEN"),
                timeout: Duration::from_millis(timeout_ms),
                create_topic,
            },
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} {v:?}: {e}")),
        None => Ok(default),
    }
}
