//! Request Code Use Case
//!
//! First step of the recovery flow: take an email address, start a flow
//! for the matching account and dispatch a reset code.

use crate::application::config::RecoveryConfig;
use crate::domain::entities::RecoveryFlow;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::{
    AccountGateway, RecoveryFlowRepository, RecoveryRateLimitRepository,
};
use crate::domain::services::code_digest;
use crate::domain::value_objects::{ClientFingerprint, ResetCode};
use crate::error::{RecoveryError, RecoveryResult};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct RequestCodeInput {
    pub email: String,
}

#[derive(Debug)]
pub struct RequestCodeOutput {
    pub flow_id: Uuid,
    pub code_expires_at_ms: i64,
    pub resend_available_at_ms: i64,
}

pub struct RequestCodeUseCase<F, L, A, N> {
    flows: Arc<F>,
    rate_limits: Arc<L>,
    accounts: Arc<A>,
    notifier: Arc<N>,
    config: Arc<RecoveryConfig>,
}

impl<F, L, A, N> RequestCodeUseCase<F, L, A, N>
where
    F: RecoveryFlowRepository,
    L: RecoveryRateLimitRepository,
    A: AccountGateway,
    N: EmailNotifier,
{
    pub fn new(
        flows: Arc<F>,
        rate_limits: Arc<L>,
        accounts: Arc<A>,
        notifier: Arc<N>,
        config: Arc<RecoveryConfig>,
    ) -> Self {
        Self {
            flows,
            rate_limits,
            accounts,
            notifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: RequestCodeInput,
        fingerprint: ClientFingerprint,
    ) -> RecoveryResult<RequestCodeOutput> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(RecoveryError::Validation("Email is required".to_string()));
        }

        let allowed = self
            .rate_limits
            .check(
                &fingerprint,
                self.config.rate_limit_max_requests,
                self.config.rate_limit_window_ms(),
            )
            .await?;
        if !allowed {
            return Err(RecoveryError::RateLimited);
        }

        let account = self
            .accounts
            .find_account_by_email(&email)
            .await?
            .ok_or(RecoveryError::UnknownEmail)?;

        let mut flow = RecoveryFlow::new(
            account.user_id,
            email,
            &fingerprint,
            self.config.flow_ttl_chrono(),
        );

        let code = ResetCode::generate();
        let now_ms = Utc::now().timestamp_millis();
        flow.arm_code(
            code_digest(&self.config.code_secret, flow.flow_id, &code),
            now_ms,
            self.config.code_ttl_ms(),
            self.config.resend_cooldown_ms(),
        )?;

        self.flows.create(&flow).await?;

        // A flow whose code was never delivered is useless; roll it back
        // so the client can start over cleanly.
        if let Err(e) = self
            .notifier
            .send_reset_code(
                &flow.email,
                &account.display_name,
                code.as_str(),
                self.config.code_ttl_minutes(),
            )
            .await
        {
            self.flows.delete(flow.flow_id).await?;
            return Err(e);
        }

        tracing::info!(flow_id = %flow.flow_id, "Recovery code dispatched");

        Ok(RequestCodeOutput {
            flow_id: flow.flow_id,
            code_expires_at_ms: flow.code_expires_at_ms,
            resend_available_at_ms: flow.resend_available_at_ms,
        })
    }
}
