//! Kafka event consumer

use crate::handlers::dispatch;
use rdkafka::{
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
    Message,
};
use shared::{constants::KAFKA_TOPIC_PREFIX, AppError, AppResult};
use uuid::Uuid;

/// Subscribes to a fixed set of topics and dispatches each message to
/// `handlers::dispatch`. A malformed message is logged and skipped rather
/// than killing the consumer loop — one bad payload shouldn't stop delivery
/// of everything behind it in the partition.
pub struct EventConsumerManager {
    consumer: StreamConsumer,
}

impl EventConsumerManager {
    pub async fn new(config: &shared::KafkaConfig, topics: Vec<String>) -> AppResult<Self> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", config.brokers.join(","))
            .set("group.id", &config.group_id)
            .set("client.id", &config.client_id)
            .set("auto.offset.reset", &config.auto_offset_reset)
            .set("enable.auto.commit", config.enable_auto_commit.to_string())
            .set("session.timeout.ms", config.session_timeout_ms.to_string())
            .set("heartbeat.interval.ms", config.heartbeat_interval_ms.to_string())
            .set("max.poll.interval.ms", config.max_poll_interval_ms.to_string());

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

        let consumer: StreamConsumer = client_config
            .create()
            .map_err(|e| AppError::ExternalService(format!("failed to create Kafka consumer: {e}")))?;

        let qualified: Vec<String> = topics.iter().map(|t| format!("{KAFKA_TOPIC_PREFIX}.{t}")).collect();
        let topic_refs: Vec<&str> = qualified.iter().map(String::as_str).collect();
        consumer
            .subscribe(&topic_refs)
            .map_err(|e| AppError::ExternalService(format!("failed to subscribe to topics: {e}")))?;

        Ok(Self { consumer })
    }

    pub async fn start(&self) -> AppResult<()> {
        tracing::info!("Kafka consumer manager started");

        loop {
            match self.consumer.recv().await {
                Ok(message) => {
                    let topic = message.topic().to_string();
                    let payload = message.payload().map(|p| p.to_vec());
                    let correlation_id = Uuid::new_v4();

                    match payload {
                        Some(bytes) => {
                            if let Err(e) = dispatch(&topic, &bytes, correlation_id).await {
                                tracing::error!(%topic, %correlation_id, "event handling failed: {e}");
                            }
                        }
                        None => {
                            tracing::warn!(%topic, "received message with empty payload");
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("error receiving message from Kafka: {e}");
                }
            }
        }
    }
}
