//! Reset Password Use Case
//!
//! Final step: replace the account's password. The mismatch check runs
//! before any repository access, so a typo'd confirmation never touches
//! storage. Completing the reset burns the flow and revokes every live
//! session of the account.

use crate::application::config::RecoveryConfig;
use crate::domain::entities::RecoveryStep;
use crate::domain::repository::{AccountGateway, RecoveryFlowRepository};
use crate::domain::value_objects::ClientFingerprint;
use crate::error::{RecoveryError, RecoveryResult};
use chrono::Utc;
use platform::password::ClearTextPassword;
use std::sync::Arc;
use uuid::Uuid;

pub struct ResetPasswordInput {
    pub flow_id: Uuid,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug)]
pub struct ResetPasswordOutput {
    /// Where the client should navigate next
    pub redirect_to: &'static str,
}

pub struct ResetPasswordUseCase<F, A> {
    flows: Arc<F>,
    accounts: Arc<A>,
    config: Arc<RecoveryConfig>,
}

impl<F, A> ResetPasswordUseCase<F, A>
where
    F: RecoveryFlowRepository,
    A: AccountGateway,
{
    pub fn new(flows: Arc<F>, accounts: Arc<A>, config: Arc<RecoveryConfig>) -> Self {
        Self {
            flows,
            accounts,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: ResetPasswordInput,
        fingerprint: ClientFingerprint,
    ) -> RecoveryResult<ResetPasswordOutput> {
        // Local checks first; nothing leaves the process until they pass
        if input.new_password != input.confirm_password {
            return Err(RecoveryError::PasswordMismatch);
        }

        let password = ClearTextPassword::new(input.new_password)
            .map_err(|e| RecoveryError::PasswordValidation(e.to_string()))?;

        let flow = self
            .flows
            .find_by_id(input.flow_id)
            .await?
            .ok_or(RecoveryError::FlowNotFound)?;

        if !flow.belongs_to(&fingerprint) {
            return Err(RecoveryError::FingerprintMismatch);
        }

        let now_ms = Utc::now().timestamp_millis();
        if flow.is_expired(now_ms) {
            self.flows.delete(flow.flow_id).await?;
            return Err(RecoveryError::FlowExpired);
        }

        if flow.step != RecoveryStep::ResetPassword {
            return Err(RecoveryError::InvalidStep);
        }

        let hashed = password
            .hash(self.config.pepper())
            .map_err(|e| RecoveryError::Internal(e.to_string()))?;

        self.accounts
            .replace_password_hash(flow.user_id, hashed.as_phc_string())
            .await?;

        let revoked = self.accounts.revoke_sessions(flow.user_id).await?;
        self.flows.delete(flow.flow_id).await?;

        tracing::info!(
            flow_id = %flow.flow_id,
            sessions_revoked = revoked,
            "Password reset completed"
        );

        Ok(ResetPasswordOutput {
            redirect_to: "/login",
        })
    }
}
