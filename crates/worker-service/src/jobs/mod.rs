//! Job payload types processed by this worker. Each corresponds to one of
//! the background tasks `SPEC_FULL.md` §2 names for `worker-service`:
//! `ImportJob` row-by-row processing, `WebhookEvent` retention GC, and
//! expired-token sweep.

use database::models::ImportJobId;
use serde::{Deserialize, Serialize};

/// Drives one `ImportJob` from `processing` to `completed`/`failed`,
/// appending an `ImportJobLog` line per row (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJobPayload {
    pub import_job_id: ImportJobId,
}

/// Deletes `WebhookEvent` rows older than `retention_days` (`DeleteOlderThan`,
/// §4.5) — a scheduled GC, not a correctness primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookGcPayload {
    pub retention_days: i64,
}

/// Deletes invitations, password reset tokens, and unused license keys past
/// their expiry. Same GC framing as `WebhookGcPayload`: the expiry check at
/// redemption time is the correctness primitive, this just reclaims storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSweepPayload;
