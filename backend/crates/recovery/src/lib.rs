//! Password Recovery Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Recovery flow state machine, repository traits, notifier port
//! - `application/` - Use cases (request / verify / reset / resend)
//! - `infra/` - PostgreSQL repository, HTTP mail delivery client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Flow Model
//! A recovery flow is a server-side state machine with three steps:
//! enter-email, enter-code, reset-password. Each step is only reachable
//! through its predecessor; jumping ahead is rejected with a conflict.
//!
//! ## Security Model
//! - Reset codes are 6-digit, short-lived, stored only as HMAC digests
//! - Flows are bound to the requesting client fingerprint
//! - Code entry is attempt-limited; requests are rate-limited per client
//! - Completing a reset revokes every live session of the account

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::RecoveryConfig;
pub use error::{RecoveryError, RecoveryResult};
pub use infra::email::HttpEmailNotifier;
pub use infra::postgres::PgRecoveryRepository;
pub use presentation::router::recovery_router;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgRecoveryRepository as RecoveryStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
