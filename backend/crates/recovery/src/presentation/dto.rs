//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/recovery/request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodeRequest {
    pub email: String,
}

/// Response for POST /api/recovery/request and /resend
///
/// The timestamps drive the client's expiry and resend countdowns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub flow_id: Uuid,
    pub code_expires_at_ms: i64,
    pub resend_available_at_ms: i64,
}

/// Request for POST /api/recovery/verify
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub flow_id: Uuid,
    pub code: String,
}

/// Response for POST /api/recovery/verify
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    pub flow_id: Uuid,
    pub step: &'static str,
}

/// Request for POST /api/recovery/reset
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub flow_id: Uuid,
    pub new_password: String,
    pub confirm_password: String,
}

/// Response for POST /api/recovery/reset
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub redirect_to: &'static str,
}

/// Request for POST /api/recovery/resend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCodeRequest {
    pub flow_id: Uuid,
}
