//! Kafka event producer

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord},
};
use serde::Serialize;
use shared::{constants::KAFKA_TOPIC_PREFIX, AppError, AppResult, CorrelationId, EventPublisher};
use std::time::Duration;

/// Owns the single `FutureProducer` this process publishes domain events
/// through. `start` just keeps the task alive for `main.rs`'s
/// supervised-handle shutdown; actual publishing happens through
/// [`EventPublisher`] calls made by other components of this crate (or, in
/// a fuller deployment, by the services that decide an event occurred).
pub struct EventProducerManager {
    producer: FutureProducer,
}

impl EventProducerManager {
    pub async fn new(config: &shared::KafkaConfig) -> AppResult<Self> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", config.brokers.join(","))
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", "10000");

        if let Some(protocol) = &config.security_protocol {
            client_config.set("security.protocol", protocol);
        }
        if let Some(mechanism) = &config.sasl_mechanism {
            client_config.set("sasl.mechanism", mechanism);
        }
        if let Some(username) = &config.sasl_username {
            client_config.set("sasl.username", username);
        }
        if let Some(password) = &config.sasl_password {
            client_config.set("sasl.password", password);
        }

        let producer: FutureProducer = client_config
            .create()
            .map_err(|e| AppError::ExternalService(format!("failed to create Kafka producer: {e}")))?;

        Ok(Self { producer })
    }

    pub async fn start(&self) -> AppResult<()> {
        tracing::info!("Kafka producer manager ready");
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
            tracing::debug!("Kafka producer manager heartbeat");
        }
    }

    fn qualify(topic: &str) -> String {
        format!("{KAFKA_TOPIC_PREFIX}.{topic}")
    }
}

#[async_trait]
impl EventPublisher for EventProducerManager {
    async fn publish<T>(&self, topic: &str, event: &T, correlation_id: CorrelationId) -> AppResult<()>
    where
        T: Serialize + Send + Sync,
    {
        self.publish_with_key(topic, &correlation_id.to_string(), event, correlation_id)
            .await
    }

    async fn publish_with_key<T>(
        &self,
        topic: &str,
        key: &str,
        event: &T,
        correlation_id: CorrelationId,
    ) -> AppResult<()>
    where
        T: Serialize + Send + Sync,
    {
        let payload = serde_json::to_vec(event)?;
        let qualified_topic = Self::qualify(topic);

        let record = FutureRecord::to(&qualified_topic).key(key).payload(&payload);

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(e, _)| {
                AppError::ExternalService(format!(
                    "failed to publish to {qualified_topic} (correlation_id={correlation_id}): {e}"
                ))
            })?;

        tracing::debug!(topic = %qualified_topic, %correlation_id, "published event");
        Ok(())
    }
}
