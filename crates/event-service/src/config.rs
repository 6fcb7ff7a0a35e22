//! Event service configuration

use shared::KafkaConfig;

/// Re-exported so `main.rs` can refer to `EventConfig` the same way
/// `api-service`/`worker-service` refer to their own config type, even
/// though this crate needs nothing beyond the shared `KafkaConfig`.
pub type EventConfig = KafkaConfig;
