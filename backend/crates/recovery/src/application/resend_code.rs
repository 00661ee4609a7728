//! Resend Code Use Case
//!
//! Dispatch a fresh code for a flow stuck at code entry, no earlier than
//! the cooldown allows. The old code stops working the moment the new one
//! is armed.

use crate::application::config::RecoveryConfig;
use crate::domain::entities::RecoveryStep;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::{AccountGateway, RecoveryFlowRepository};
use crate::domain::services::code_digest;
use crate::domain::value_objects::{ClientFingerprint, ResetCode};
use crate::error::{RecoveryError, RecoveryResult};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct ResendCodeInput {
    pub flow_id: Uuid,
}

#[derive(Debug)]
pub struct ResendCodeOutput {
    pub flow_id: Uuid,
    pub code_expires_at_ms: i64,
    pub resend_available_at_ms: i64,
}

pub struct ResendCodeUseCase<F, A, N> {
    flows: Arc<F>,
    accounts: Arc<A>,
    notifier: Arc<N>,
    config: Arc<RecoveryConfig>,
}

impl<F, A, N> ResendCodeUseCase<F, A, N>
where
    F: RecoveryFlowRepository,
    A: AccountGateway,
    N: EmailNotifier,
{
    pub fn new(
        flows: Arc<F>,
        accounts: Arc<A>,
        notifier: Arc<N>,
        config: Arc<RecoveryConfig>,
    ) -> Self {
        Self {
            flows,
            accounts,
            notifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: ResendCodeInput,
        fingerprint: ClientFingerprint,
    ) -> RecoveryResult<ResendCodeOutput> {
        let mut flow = self
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

        if flow.step != RecoveryStep::EnterCode {
            return Err(RecoveryError::InvalidStep);
        }

        if let Some(retry_in_secs) = flow.resend_wait_secs(now_ms) {
            return Err(RecoveryError::ResendThrottled { retry_in_secs });
        }

        let account = self
            .accounts
            .find_account_by_email(&flow.email)
            .await?
            .ok_or(RecoveryError::UnknownEmail)?;

        let code = ResetCode::generate();
        flow.arm_code(
            code_digest(&self.config.code_secret, flow.flow_id, &code),
            now_ms,
            self.config.code_ttl_ms(),
            self.config.resend_cooldown_ms(),
        )?;

        self.flows.update(&flow).await?;

        self.notifier
            .send_reset_code(
                &flow.email,
                &account.display_name,
                code.as_str(),
                self.config.code_ttl_minutes(),
            )
            .await?;

        tracing::info!(flow_id = %flow.flow_id, "Recovery code resent");

        Ok(ResendCodeOutput {
            flow_id: flow.flow_id,
            code_expires_at_ms: flow.code_expires_at_ms,
            resend_available_at_ms: flow.resend_available_at_ms,
        })
    }
}
