//! Accounts Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::repository::{
    CredentialRepository, SessionRepository, UserRepository, VendorProfileRepository,
};
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountAppState};

/// Create the Accounts router with PostgreSQL repository
pub fn account_router(repo: PgAccountRepository, config: AccountConfig) -> Router {
    account_router_generic(repo, config)
}

/// Create a generic Accounts router for any repository implementation
pub fn account_router_generic<R>(repo: R, config: AccountConfig) -> Router
where
    R: UserRepository
        + VendorProfileRepository
        + CredentialRepository
        + SessionRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let state = AccountAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .with_state(state)
}
