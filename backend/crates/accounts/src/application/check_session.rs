//! Check Session Use Case
//!
//! Verifies the presented token against the session store.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::session_token::parse_session_token;
use crate::domain::entity::session::AuthSession;
use crate::domain::repository::SessionRepository;
use crate::error::{AccountError, AccountResult};

/// Session info output
pub struct SessionInfoOutput {
    pub public_id: String,
    pub role: String,
    pub expires_at_ms: i64,
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Check if session is valid and return session info
    pub async fn execute(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AccountResult<SessionInfoOutput> {
        let session = self.get_session(session_token, fingerprint_hash).await?;

        Ok(SessionInfoOutput {
            public_id: session.public_id.to_string(),
            role: session.role.code().to_string(),
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Get session and update last activity
    pub async fn get_session(
        &self,
        session_token: &str,
        fingerprint_hash: &[u8],
    ) -> AccountResult<AuthSession> {
        let session_id = parse_session_token(session_token, &self.config.session_secret)
            .ok_or(AccountError::SessionInvalid)?;

        let session = self
            .session_repo
            .find_by_id(session_id, fingerprint_hash)
            .await?
            .ok_or(AccountError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(AccountError::SessionInvalid);
        }

        let mut session = session;
        session.touch();

        // Update last activity in the background
        let session_clone = session.clone();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update(&session_clone).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}
