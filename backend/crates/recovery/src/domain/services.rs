//! Domain Services
//!
//! Code digest helpers. The digest is keyed with an application secret and
//! bound to the flow id, so a digest leaked from one flow is useless for
//! any other.

use crate::domain::value_objects::ResetCode;
use uuid::Uuid;

/// Compute the stored digest for a code within a flow
pub fn code_digest(secret: &[u8; 32], flow_id: Uuid, code: &ResetCode) -> Vec<u8> {
    let mut data = Vec::with_capacity(16 + code.as_str().len());
    data.extend_from_slice(flow_id.as_bytes());
    data.extend_from_slice(code.as_str().as_bytes());
    platform::crypto::hmac_sha256(secret, &data).to_vec()
}

/// Constant-time check of a submitted code against the stored digest
pub fn code_matches(secret: &[u8; 32], flow_id: Uuid, code: &ResetCode, stored: &[u8]) -> bool {
    let computed = code_digest(secret, flow_id, code);
    platform::crypto::constant_time_eq(&computed, stored)
}
