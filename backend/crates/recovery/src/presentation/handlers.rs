//! HTTP Handlers

use crate::application::config::RecoveryConfig;
use crate::application::request_code::{RequestCodeInput, RequestCodeUseCase};
use crate::application::resend_code::{ResendCodeInput, ResendCodeUseCase};
use crate::application::reset_password::{ResetPasswordInput, ResetPasswordUseCase};
use crate::application::verify_code::{VerifyCodeInput, VerifyCodeUseCase};
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::{
    AccountGateway, RecoveryFlowRepository, RecoveryRateLimitRepository,
};
use crate::error::RecoveryResult;
use crate::presentation::dto::{
    FlowResponse, RequestCodeRequest, ResendCodeRequest, ResetPasswordRequest,
    ResetPasswordResponse, VerifyCodeRequest, VerifyCodeResponse,
};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use platform::client::{extract_client_ip, extract_fingerprint};
use std::sync::Arc;

/// Shared state for recovery handlers
#[derive(Clone)]
pub struct RecoveryAppState<R, N>
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
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<RecoveryConfig>,
}

/// POST /api/recovery/request
pub async fn request_code<R, N>(
    State(state): State<RecoveryAppState<R, N>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<RequestCodeRequest>,
) -> RecoveryResult<Json<FlowResponse>>
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
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = RequestCodeUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RequestCodeInput { email: req.email }, fingerprint)
        .await?;

    Ok(Json(FlowResponse {
        flow_id: output.flow_id,
        code_expires_at_ms: output.code_expires_at_ms,
        resend_available_at_ms: output.resend_available_at_ms,
    }))
}

/// POST /api/recovery/verify
pub async fn verify_code<R, N>(
    State(state): State<RecoveryAppState<R, N>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<VerifyCodeRequest>,
) -> RecoveryResult<Json<VerifyCodeResponse>>
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
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = VerifyCodeUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(
            VerifyCodeInput {
                flow_id: req.flow_id,
                code: req.code,
            },
            fingerprint,
        )
        .await?;

    Ok(Json(VerifyCodeResponse {
        flow_id: output.flow_id,
        step: output.step.as_str(),
    }))
}

/// POST /api/recovery/reset
pub async fn reset_password<R, N>(
    State(state): State<RecoveryAppState<R, N>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<ResetPasswordRequest>,
) -> RecoveryResult<Json<ResetPasswordResponse>>
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
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case =
        ResetPasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(
            ResetPasswordInput {
                flow_id: req.flow_id,
                new_password: req.new_password,
                confirm_password: req.confirm_password,
            },
            fingerprint,
        )
        .await?;

    Ok(Json(ResetPasswordResponse {
        redirect_to: output.redirect_to,
    }))
}

/// POST /api/recovery/resend
pub async fn resend_code<R, N>(
    State(state): State<RecoveryAppState<R, N>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<ResendCodeRequest>,
) -> RecoveryResult<Json<FlowResponse>>
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
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = ResendCodeUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(ResendCodeInput { flow_id: req.flow_id }, fingerprint)
        .await?;

    Ok(Json(FlowResponse {
        flow_id: output.flow_id,
        code_expires_at_ms: output.code_expires_at_ms,
        resend_available_at_ms: output.resend_available_at_ms,
    }))
}
