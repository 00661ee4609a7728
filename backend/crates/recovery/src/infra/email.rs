//! HTTP Mail Delivery Client
//!
//! Implements the [`EmailNotifier`] port against a JSON mail delivery
//! API (any transactional mail provider with a simple send endpoint).

use crate::domain::notifier::EmailNotifier;
use crate::error::{RecoveryError, RecoveryResult};
use serde::Serialize;

/// Outbound message body for the delivery API
#[derive(Serialize)]
struct SendMailBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Mail notifier backed by an HTTP delivery API
#[derive(Clone)]
pub struct HttpEmailNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

impl HttpEmailNotifier {
    pub fn new(endpoint: String, api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from_address,
        }
    }
}

impl EmailNotifier for HttpEmailNotifier {
    async fn send_reset_code(
        &self,
        to: &str,
        display_name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> RecoveryResult<()> {
        let body = SendMailBody {
            from: &self.from_address,
            to,
            subject: "Your password reset code",
            text: format!(
                "Hi {display_name},\n\n\
                 Your password reset code is: {code}\n\n\
                 It expires in {valid_minutes} minutes. If you did not request \
                 a password reset, you can ignore this email.\n"
            ),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecoveryError::DeliveryFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RecoveryError::DeliveryFailed(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        tracing::info!(to = %to, "Recovery mail accepted by delivery API");
        Ok(())
    }
}
