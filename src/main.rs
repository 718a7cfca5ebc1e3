use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;

mod config;
mod functions;
mod schema;
mod services;

use config::Config;
use functions::AppState;
use services::post_processor::AuditPostProcessor;
use services::publisher::PubSubEventPublisher;
use services::pubsub_client::PubSubClient;
use services::repository::PgEventMessageRepository;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database ready");

    let client = Arc::new(PubSubClient::new(&config.pubsub)?);
    if config.pubsub.create_topic {
        client.create_topic(&config.pubsub.topic).await?;
        tracing::info!(topic = %config.pubsub.topic, "topic ensured");
    }

    let repository = Arc::new(PgEventMessageRepository::new(pool.clone()));
    let post_processor = Arc::new(AuditPostProcessor::new(repository.clone()));
    let publisher = Arc::new(PubSubEventPublisher::new(
        client,
        config.pubsub.topic.clone(),
        post_processor,
    ));

    let app = functions::router(AppState {
        publisher,
        repository,
    });

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    tracing::info!(
        addr = %config.http_addr,
        endpoint = %config.pubsub.endpoint,
        project = %config.pubsub.project_id,
        topic = %config.pubsub.topic,
        "pubsub bridge listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
