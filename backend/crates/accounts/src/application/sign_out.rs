//! Sign Out Use Case
//!
//! Deletes the session referenced by the presented token. An invalid
//! or already-deleted token is not an error; logout is idempotent.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::session_token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::AccountResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str) -> AccountResult<()> {
        let Some(session_id) = parse_session_token(session_token, &self.config.session_secret)
        else {
            // Nothing to delete; the cookie is cleared regardless.
            return Ok(());
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");

        Ok(())
    }
}
