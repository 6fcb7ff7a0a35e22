//! Common error types used across all services
//!
//! `AppError` carries the domain-level error taxonomy that the persistence
//! core propagates unchanged to its callers: `NotFound`, `Conflict`,
//! `Invalid`, `Unauthorized`, `Internal`, `Retryable`, alongside the
//! teacher's original ambient variants (database/redis/kafka/io transport
//! errors) that the taxonomy's own `Internal`/`Retryable` members classify
//! driver failures into.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Row missing, or filtered out by tenant scope / soft-delete.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique-constraint violation or a rejected state transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A value failed reconstruction: unknown enum string, malformed ID,
    /// a monotonic-timestamp invariant violated.
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Not produced by the persistence core itself; the API layer raises it.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unclassified driver / connectivity failure, or a scan/reconstruction
    /// failure (which indicates data corruption, not a bad input value).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization failure or a dropped connection inside `with_tx`; safe
    /// for the caller to retry the whole unit of work.
    #[error("Retryable: {0}")]
    Retryable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Kafka error: {0}")]
    Kafka(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Invalid(_) => 400,
            AppError::Authentication(_) | AppError::Unauthorized(_) => 401,
            AppError::Authorization(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Retryable(_) => 503,
            _ => 500,
        }
    }

    /// Check if this error should be logged as an error (vs warning/info)
    pub fn should_log_error(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Redis(_)
                | AppError::Kafka(_)
                | AppError::Internal(_)
                | AppError::ExternalService(_)
                | AppError::Configuration(_)
                | AppError::Network(_)
                | AppError::Io(_)
                | AppError::Generic(_)
        )
    }

    /// Classify a driver-level `sqlx::Error` into the domain taxonomy at the
    /// repository call boundary, per the SQLSTATE code Postgres reports.
    /// Scan/row-decode failures are `Internal`, never `Invalid`: they
    /// indicate corrupt data, not a bad caller-supplied value.
    pub fn from_sqlx_classified(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => AppError::Conflict(db_err.message().to_string()),
                Some("40001") => AppError::Retryable(db_err.message().to_string()),
                Some("40P01") => AppError::Retryable("deadlock detected".to_string()),
                _ => AppError::Database(err),
            },
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::Retryable(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                AppError::Internal(format!("row reconstruction failed: {err}"))
            }
            _ => AppError::Database(err),
        }
    }
}

/// Validation error details
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Multiple validation errors
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(format!("Validation failed: {:?}", errors.errors))
    }
}