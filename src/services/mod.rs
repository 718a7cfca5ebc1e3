pub mod post_processor;
pub mod publisher;
pub mod pubsub_client;
pub mod repository;
