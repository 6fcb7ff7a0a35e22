//! API handlers

pub mod admins;
pub mod auth;
pub mod error;
pub mod health;
pub mod invitations;
pub mod members;
pub mod tenants;

// Re-export handler modules
pub use admins::*;
pub use auth::*;
pub use health::*;
pub use invitations::*;
pub use members::*;
pub use tenants::*;
