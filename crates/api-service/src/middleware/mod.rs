//! API middleware

pub mod auth;
pub mod logging;
pub mod metrics;

// Re-export middleware modules
pub use auth::*;
pub use logging::*;
pub use metrics::*;