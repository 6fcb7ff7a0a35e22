//! Event handlers: one per domain event this service consumes. Each is a
//! thin [`shared::EventHandler`] implementation that logs the event —
//! downstream notification delivery (email, webhook fan-out) lives outside
//! this repository (`SPEC_FULL.md` §1).

use async_trait::async_trait;
use serde::Deserialize;
use shared::{constants::{events, KAFKA_TOPIC_PREFIX}, AppResult, CorrelationId, EventHandler};

#[derive(Debug, Deserialize)]
pub struct AnnouncementPublishedEvent {
    pub announcement_id: String,
    pub tenant_id: String,
}

pub struct AnnouncementPublishedHandler;

#[async_trait]
impl EventHandler<AnnouncementPublishedEvent> for AnnouncementPublishedHandler {
    async fn handle(&self, event: &AnnouncementPublishedEvent, correlation_id: CorrelationId) -> AppResult<()> {
        tracing::info!(
            announcement_id = %event.announcement_id,
            tenant_id = %event.tenant_id,
            %correlation_id,
            "announcement published"
        );
        Ok(())
    }

    fn event_type(&self) -> &'static str {
        events::ANNOUNCEMENT_PUBLISHED
    }
}

#[derive(Debug, Deserialize)]
pub struct ImportJobCompletedEvent {
    pub import_job_id: String,
    pub tenant_id: String,
}

pub struct ImportJobCompletedHandler;

#[async_trait]
impl EventHandler<ImportJobCompletedEvent> for ImportJobCompletedHandler {
    async fn handle(&self, event: &ImportJobCompletedEvent, correlation_id: CorrelationId) -> AppResult<()> {
        tracing::info!(
            import_job_id = %event.import_job_id,
            tenant_id = %event.tenant_id,
            %correlation_id,
            "import job completed"
        );
        Ok(())
    }

    fn event_type(&self) -> &'static str {
        events::IMPORT_JOB_COMPLETED
    }
}

/// Routes a raw Kafka message to the handler for its topic, stripping the
/// `KAFKA_TOPIC_PREFIX` qualifier `producers::EventProducerManager` adds.
/// An unrecognized topic is logged and dropped rather than erroring the
/// consumer loop, since a topic this service doesn't know about is not this
/// process's fault.
pub async fn dispatch(topic: &str, payload: &[u8], correlation_id: CorrelationId) -> AppResult<()> {
    let event_type = topic
        .strip_prefix(&format!("{KAFKA_TOPIC_PREFIX}."))
        .unwrap_or(topic);

    match event_type {
        t if t == events::ANNOUNCEMENT_PUBLISHED => {
            let event: AnnouncementPublishedEvent = serde_json::from_slice(payload)?;
            AnnouncementPublishedHandler.handle(&event, correlation_id).await
        }
        t if t == events::IMPORT_JOB_COMPLETED => {
            let event: ImportJobCompletedEvent = serde_json::from_slice(payload)?;
            ImportJobCompletedHandler.handle(&event, correlation_id).await
        }
        other => {
            tracing::debug!(topic = %other, "no handler registered for event type");
            Ok(())
        }
    }
}
