//! Sign In Use Case
//!
//! Authenticates an account and creates a session.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::session_token::sign_session_token;
use crate::domain::entity::session::AuthSession;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword, user_role::UserRole};
use crate::error::{AccountError, AccountResult};

/// Re-export ClientFingerprint from platform
pub use platform::client::ClientFingerprint;

/// Sign in input
pub struct SignInInput {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Signed session token for the cookie
    pub session_token: String,
    /// Public ID
    pub public_id: String,
    /// Role, for the guard cookie payload and client navigation
    pub role: UserRole,
    /// Dashboard path for the role
    pub redirect_to: &'static str,
}

/// Sign in use case
pub struct SignInUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<U, C, S> SignInUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AccountConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: ClientFingerprint,
    ) -> AccountResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|_| AccountError::InvalidCredentials)?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !user.can_login() {
            return Err(AccountError::AccountDisabled);
        }

        let mut credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AccountError::Internal("Credential not found".to_string()))?;

        if credential.is_locked() {
            return Err(AccountError::AccountLocked);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AccountError::InvalidCredentials)?;

        if !credential
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            credential.record_failure();
            self.credential_repo.update(&credential).await?;
            return Err(AccountError::InvalidCredentials);
        }

        credential.reset_failures();
        self.credential_repo.update(&credential).await?;

        user.record_login();
        self.user_repo.update(&user).await?;

        let session = AuthSession::new(
            user.user_id,
            user.public_id,
            user.role,
            fingerprint.hash_vec(),
            fingerprint.ip_string(),
            fingerprint.user_agent.clone(),
            self.config.session_ttl_chrono(),
        );

        self.session_repo.create(&session).await?;

        let session_token = sign_session_token(session.session_id, &self.config.session_secret);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            role = %user.role,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            public_id: user.public_id.to_string(),
            role: user.role,
            redirect_to: user.role.dashboard_path(),
        })
    }
}
