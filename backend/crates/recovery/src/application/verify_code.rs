//! Verify Code Use Case
//!
//! Second step: check the submitted code and, on success, unlock the
//! password form. The step check makes this operation unreachable before
//! a code has been dispatched.

use crate::application::config::RecoveryConfig;
use crate::domain::entities::RecoveryStep;
use crate::domain::repository::RecoveryFlowRepository;
use crate::domain::services::code_matches;
use crate::domain::value_objects::{ClientFingerprint, ResetCode};
use crate::error::{RecoveryError, RecoveryResult};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct VerifyCodeInput {
    pub flow_id: Uuid,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub flow_id: Uuid,
    pub step: RecoveryStep,
}

pub struct VerifyCodeUseCase<F> {
    flows: Arc<F>,
    config: Arc<RecoveryConfig>,
}

impl<F> VerifyCodeUseCase<F>
where
    F: RecoveryFlowRepository,
{
    pub fn new(flows: Arc<F>, config: Arc<RecoveryConfig>) -> Self {
        Self { flows, config }
    }

    pub async fn execute(
        &self,
        input: VerifyCodeInput,
        fingerprint: ClientFingerprint,
    ) -> RecoveryResult<VerifyCodeOutput> {
        let code = ResetCode::parse(&input.code).ok_or(RecoveryError::CodeInvalid)?;

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

        if flow.attempts_exhausted() {
            return Err(RecoveryError::TooManyAttempts);
        }

        if flow.is_code_expired(now_ms) {
            return Err(RecoveryError::CodeExpired);
        }

        if !code_matches(&self.config.code_secret, flow.flow_id, &code, &flow.code_hash) {
            // The flow is burned outright at the attempt limit
            if flow.record_failed_attempt() {
                self.flows.delete(flow.flow_id).await?;
                return Err(RecoveryError::TooManyAttempts);
            }
            self.flows.update(&flow).await?;
            return Err(RecoveryError::CodeInvalid);
        }

        flow.advance_to_reset()?;
        self.flows.update(&flow).await?;

        tracing::info!(flow_id = %flow.flow_id, "Recovery code verified");

        Ok(VerifyCodeOutput {
            flow_id: flow.flow_id,
            step: flow.step,
        })
    }
}
