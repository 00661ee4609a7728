//! Recovery Router

use crate::application::config::RecoveryConfig;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::{
    AccountGateway, RecoveryFlowRepository, RecoveryRateLimitRepository,
};
use crate::infra::email::HttpEmailNotifier;
use crate::infra::postgres::PgRecoveryRepository;
use crate::presentation::handlers::{self, RecoveryAppState};
use axum::{Router, routing::post};
use std::sync::Arc;

/// Create the recovery router with PostgreSQL repository and HTTP mail
/// delivery
pub fn recovery_router(
    repo: PgRecoveryRepository,
    notifier: HttpEmailNotifier,
    config: RecoveryConfig,
) -> Router {
    recovery_router_generic(repo, notifier, config)
}

/// Create a generic recovery router for any repository and notifier
/// implementation
pub fn recovery_router_generic<R, N>(repo: R, notifier: N, config: RecoveryConfig) -> Router
where
    R: RecoveryFlowRepository
        + RecoveryRateLimitRepository
        + AccountGateway
        + Clone
        + Send
        + Sync
        + 'static,
    N: EmailNotifier + Clone + Send + Sync + 'static,
{
    let state = RecoveryAppState {
        repo: Arc::new(repo),
        notifier: Arc::new(notifier),
        config: Arc::new(config),
    };

    Router::new()
        .route("/request", post(handlers::request_code::<R, N>))
        .route("/verify", post(handlers::verify_code::<R, N>))
        .route("/reset", post(handlers::reset_password::<R, N>))
        .route("/resend", post(handlers::resend_code::<R, N>))
        .with_state(state)
}
