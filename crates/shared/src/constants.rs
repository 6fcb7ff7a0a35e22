//! Application constants

/// Default pagination limit
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum pagination limit
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default cache TTL in seconds
pub const DEFAULT_CACHE_TTL: u64 = 3600;

/// JWT token header name
pub const JWT_HEADER: &str = "Authorization";

/// JWT token prefix
pub const JWT_PREFIX: &str = "Bearer ";

/// Correlation ID header name
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Tenant ID header name
pub const TENANT_ID_HEADER: &str = "X-Tenant-ID";

/// User ID header name
pub const USER_ID_HEADER: &str = "X-User-ID";

/// API version header name
pub const API_VERSION_HEADER: &str = "X-API-Version";

/// Content type JSON
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type form
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Health check endpoint
pub const HEALTH_ENDPOINT: &str = "/health";

/// Metrics endpoint
pub const METRICS_ENDPOINT: &str = "/metrics";

/// Ready endpoint
pub const READY_ENDPOINT: &str = "/ready";

/// Live endpoint
pub const LIVE_ENDPOINT: &str = "/live";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

/// Default database schema
pub const DEFAULT_SCHEMA: &str = "public";

/// Default Kafka topic prefix
pub const KAFKA_TOPIC_PREFIX: &str = "app";

/// Event types published by the event-service for downstream notification
/// delivery (email/webhook fan-out lives outside this repository).
pub mod events {
    pub const ANNOUNCEMENT_PUBLISHED: &str = "announcement.published";
    pub const IMPORT_JOB_COMPLETED: &str = "import_job.completed";
    pub const IMPORT_JOB_FAILED: &str = "import_job.failed";
    pub const LICENSE_KEY_REDEEMED: &str = "license_key.redeemed";
    pub const INVITATION_ACCEPTED: &str = "invitation.accepted";
    pub const SHIFT_ASSIGNMENT_CANCELLED: &str = "shift_assignment.cancelled";
}

/// Job types processed by the worker-service.
pub mod jobs {
    pub const PROCESS_IMPORT_JOB: &str = "process_import_job";
    pub const SWEEP_EXPIRED_TOKENS: &str = "sweep_expired_tokens";
    pub const GC_WEBHOOK_EVENTS: &str = "gc_webhook_events";
}

/// Cache key prefixes
pub mod cache_keys {
    pub const TUTORIAL: &str = "tutorial";
    pub const ANNOUNCEMENT: &str = "announcement";
    pub const SESSION: &str = "session";
    pub const RATE_LIMIT: &str = "rate_limit";
    pub const CONFIG: &str = "config";
    pub const METRICS: &str = "metrics";
}

/// Database table names
pub mod tables {
    pub const TENANTS: &str = "tenants";
    pub const ADMINS: &str = "admins";
    pub const MEMBERS: &str = "members";
    pub const ROLES: &str = "roles";
    pub const ROLE_GROUPS: &str = "role_groups";
    pub const MEMBER_GROUPS: &str = "member_groups";
    pub const EVENTS: &str = "events";
    pub const EVENT_BUSINESS_DAYS: &str = "event_business_days";
    pub const SHIFT_SLOTS: &str = "shift_slots";
    pub const SHIFT_SLOT_TEMPLATES: &str = "shift_slot_templates";
    pub const SHIFT_SLOT_TEMPLATE_ITEMS: &str = "shift_slot_template_items";
    pub const SHIFT_ASSIGNMENTS: &str = "shift_assignments";
    pub const ATTENDANCE_COLLECTIONS: &str = "attendance_collections";
    pub const ATTENDANCE_TARGET_DATES: &str = "attendance_target_dates";
    pub const ATTENDANCE_RESPONSES: &str = "attendance_responses";
    pub const DATE_SCHEDULES: &str = "date_schedules";
    pub const SCHEDULE_CANDIDATES: &str = "schedule_candidates";
    pub const SCHEDULE_RESPONSES: &str = "schedule_responses";
    pub const CALENDARS: &str = "calendars";
    pub const CALENDAR_ENTRIES: &str = "calendar_entries";
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const ANNOUNCEMENT_READS: &str = "announcement_reads";
    pub const TUTORIALS: &str = "tutorials";
    pub const INVITATIONS: &str = "invitations";
    pub const PASSWORD_RESET_TOKENS: &str = "password_reset_tokens";
    pub const LICENSE_KEYS: &str = "license_keys";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const ENTITLEMENTS: &str = "entitlements";
    pub const PLANS: &str = "plans";
    pub const IMPORT_JOBS: &str = "import_jobs";
    pub const IMPORT_JOB_LOGS: &str = "import_job_logs";
    pub const BILLING_AUDIT_LOGS: &str = "billing_audit_logs";
    pub const WEBHOOK_EVENTS: &str = "webhook_events";
    pub const SYSTEM_SETTINGS: &str = "system_settings";
    pub const MANAGER_PERMISSIONS: &str = "manager_permissions";
}

/// Environment names
pub mod environments {
    pub const DEVELOPMENT: &str = "development";
    pub const STAGING: &str = "staging";
    pub const PRODUCTION: &str = "production";
    pub const TEST: &str = "test";
}

/// Service names
pub mod services {
    pub const API: &str = "api-service";
    pub const WORKER: &str = "worker-service";
    pub const EVENT: &str = "event-service";
}

/// Metric names
pub mod metrics {
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
    pub const DATABASE_CONNECTIONS: &str = "database_connections";
    pub const REDIS_CONNECTIONS: &str = "redis_connections";
    pub const KAFKA_MESSAGES_PRODUCED: &str = "kafka_messages_produced_total";
    pub const KAFKA_MESSAGES_CONSUMED: &str = "kafka_messages_consumed_total";
    pub const JOBS_PROCESSED: &str = "jobs_processed_total";
    pub const JOBS_FAILED: &str = "jobs_failed_total";
}

/// Log levels
pub mod log_levels {
    pub const TRACE: &str = "trace";
    pub const DEBUG: &str = "debug";
    pub const INFO: &str = "info";
    pub const WARN: &str = "warn";
    pub const ERROR: &str = "error";
}

/// HTTP status codes
pub mod status_codes {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
    pub const TOO_MANY_REQUESTS: u16 = 429;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    pub const BAD_GATEWAY: u16 = 502;
    pub const SERVICE_UNAVAILABLE: u16 = 503;
}

/// Timeouts in seconds
pub mod timeouts {
    pub const HTTP_CLIENT: u64 = 30;
    pub const DATABASE_QUERY: u64 = 30;
    pub const REDIS_OPERATION: u64 = 5;
    pub const KAFKA_PRODUCE: u64 = 10;
    pub const JOB_EXECUTION: u64 = 300;
}

/// Retry configurations
pub mod retries {
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const INITIAL_DELAY_MS: u64 = 1000;
    pub const MAX_DELAY_MS: u64 = 30000;
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
}

/// Rate limiting
pub mod rate_limits {
    pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;
    pub const AUTH_REQUESTS_PER_MINUTE: u32 = 10;
    pub const API_REQUESTS_PER_MINUTE: u32 = 1000;
}

/// File size limits
pub mod file_limits {
    pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB
    pub const MAX_JSON_PAYLOAD: usize = 1024 * 1024; // 1MB
}

/// Validation rules
pub mod validation {
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    pub const MAX_PASSWORD_LENGTH: usize = 128;
    pub const MIN_USERNAME_LENGTH: usize = 3;
    pub const MAX_USERNAME_LENGTH: usize = 50;
    pub const MAX_EMAIL_LENGTH: usize = 254;
    pub const MAX_NAME_LENGTH: usize = 100;
}