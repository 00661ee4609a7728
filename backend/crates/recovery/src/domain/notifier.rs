//! Notifier Port
//!
//! Outbound mail delivery as seen from the domain. The production
//! implementation lives in `infra::email`.

use crate::error::RecoveryResult;

/// Dispatches recovery codes to account owners
#[trait_variant::make(EmailNotifier: Send)]
pub trait LocalEmailNotifier {
    /// Send a reset code to `to`, valid for `valid_minutes`
    async fn send_reset_code(
        &self,
        to: &str,
        display_name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> RecoveryResult<()>;
}
