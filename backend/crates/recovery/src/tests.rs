//! Use case tests against in-memory implementations

mod support {
    use crate::domain::entities::RecoveryFlow;
    use crate::domain::notifier::EmailNotifier;
    use crate::domain::repository::{
        AccountGateway, RecoveryAccount, RecoveryFlowRepository, RecoveryRateLimitRepository,
    };
    use crate::domain::value_objects::ClientFingerprint;
    use crate::error::{RecoveryError, RecoveryResult};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MemInner {
        pub flows: Mutex<Vec<RecoveryFlow>>,
        pub rate_counts: Mutex<HashMap<Vec<u8>, u32>>,
        pub accounts: Mutex<Vec<RecoveryAccount>>,
        pub password_writes: Mutex<Vec<(Uuid, String)>>,
        pub revoked_sessions: AtomicUsize,
        pub flow_reads: AtomicUsize,
    }

    /// In-memory repository implementing all three persistence ports
    #[derive(Clone, Default)]
    pub struct MemRecoveryRepo {
        pub inner: Arc<MemInner>,
    }

    impl MemRecoveryRepo {
        pub fn with_account(email: &str, display_name: &str) -> (Self, Uuid) {
            let repo = Self::default();
            let user_id = Uuid::new_v4();
            repo.inner.accounts.lock().unwrap().push(RecoveryAccount {
                user_id,
                email: email.to_string(),
                display_name: display_name.to_string(),
            });
            (repo, user_id)
        }

        pub fn flow_reads(&self) -> usize {
            self.inner.flow_reads.load(Ordering::SeqCst)
        }

        /// Rewind a stored flow's timers so tests can cross time windows
        pub fn rewind(&self, flow_id: Uuid, f: impl FnOnce(&mut RecoveryFlow)) {
            let mut flows = self.inner.flows.lock().unwrap();
            let flow = flows
                .iter_mut()
                .find(|fl| fl.flow_id == flow_id)
                .expect("flow exists");
            f(flow);
        }
    }

    impl RecoveryFlowRepository for MemRecoveryRepo {
        async fn create(&self, flow: &RecoveryFlow) -> RecoveryResult<()> {
            self.inner.flows.lock().unwrap().push(flow.clone());
            Ok(())
        }

        async fn find_by_id(&self, flow_id: Uuid) -> RecoveryResult<Option<RecoveryFlow>> {
            self.inner.flow_reads.fetch_add(1, Ordering::SeqCst);
            let flows = self.inner.flows.lock().unwrap();
            Ok(flows.iter().find(|f| f.flow_id == flow_id).cloned())
        }

        async fn update(&self, flow: &RecoveryFlow) -> RecoveryResult<()> {
            let mut flows = self.inner.flows.lock().unwrap();
            if let Some(stored) = flows.iter_mut().find(|f| f.flow_id == flow.flow_id) {
                *stored = flow.clone();
            }
            Ok(())
        }

        async fn delete(&self, flow_id: Uuid) -> RecoveryResult<()> {
            self.inner.flows.lock().unwrap().retain(|f| f.flow_id != flow_id);
            Ok(())
        }
    }

    impl RecoveryRateLimitRepository for MemRecoveryRepo {
        async fn check(
            &self,
            fingerprint: &ClientFingerprint,
            max_requests: u32,
            _window_ms: i64,
        ) -> RecoveryResult<bool> {
            let mut counts = self.inner.rate_counts.lock().unwrap();
            let count = counts.entry(fingerprint.hash_vec()).or_insert(0);
            *count += 1;
            Ok(*count <= max_requests)
        }
    }

    impl AccountGateway for MemRecoveryRepo {
        async fn find_account_by_email(
            &self,
            email: &str,
        ) -> RecoveryResult<Option<RecoveryAccount>> {
            let accounts = self.inner.accounts.lock().unwrap();
            Ok(accounts.iter().find(|a| a.email == email).cloned())
        }

        async fn replace_password_hash(&self, user_id: Uuid, phc: &str) -> RecoveryResult<()> {
            self.inner
                .password_writes
                .lock()
                .unwrap()
                .push((user_id, phc.to_string()));
            Ok(())
        }

        async fn revoke_sessions(&self, user_id: Uuid) -> RecoveryResult<u64> {
            let _ = user_id;
            self.inner.revoked_sessions.fetch_add(1, Ordering::SeqCst);
            Ok(2)
        }
    }

    #[derive(Debug, Clone)]
    pub struct SentMail {
        pub to: String,
        pub code: String,
    }

    /// Notifier that captures dispatched codes instead of sending mail
    #[derive(Clone, Default)]
    pub struct MemNotifier {
        pub sent: Arc<Mutex<Vec<SentMail>>>,
        pub fail: Arc<AtomicBool>,
    }

    impl MemNotifier {
        pub fn last_code(&self) -> String {
            self.sent
                .lock()
                .unwrap()
                .last()
                .map(|m| m.code.clone())
                .expect("a mail was sent")
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl EmailNotifier for MemNotifier {
        async fn send_reset_code(
            &self,
            to: &str,
            _display_name: &str,
            code: &str,
            _valid_minutes: i64,
        ) -> RecoveryResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RecoveryError::DeliveryFailed("mail API down".to_string()));
            }
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                code: code.to_string(),
            });
            Ok(())
        }
    }

    pub fn fingerprint() -> ClientFingerprint {
        ClientFingerprint::new([7u8; 32], None, Some("test-agent".to_string()))
    }

    pub fn other_fingerprint() -> ClientFingerprint {
        ClientFingerprint::new([9u8; 32], None, Some("other-agent".to_string()))
    }
}

mod request_tests {
    use super::support::{MemNotifier, MemRecoveryRepo, fingerprint};
    use crate::application::config::RecoveryConfig;
    use crate::application::request_code::{RequestCodeInput, RequestCodeUseCase};
    use crate::error::RecoveryError;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn use_case(
        repo: &MemRecoveryRepo,
        notifier: &MemNotifier,
    ) -> RequestCodeUseCase<MemRecoveryRepo, MemRecoveryRepo, MemRecoveryRepo, MemNotifier> {
        RequestCodeUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(notifier.clone()),
            Arc::new(RecoveryConfig::with_random_secret()),
        )
    }

    #[tokio::test]
    async fn dispatches_a_code_for_a_known_account() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();

        let output = use_case(&repo, &notifier)
            .execute(
                RequestCodeInput {
                    email: "Ama@Example.com ".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap();

        assert_eq!(notifier.sent_count(), 1);
        assert_eq!(notifier.last_code().len(), 6);
        assert!(output.resend_available_at_ms < output.code_expires_at_ms);
        assert_eq!(repo.inner.flows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_without_mail() {
        let repo = MemRecoveryRepo::default();
        let notifier = MemNotifier::default();

        let err = use_case(&repo, &notifier)
            .execute(
                RequestCodeInput {
                    email: "nobody@example.com".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::UnknownEmail));
        assert_eq!(notifier.sent_count(), 0);
        assert!(repo.inner.flows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_email_fails_validation() {
        let repo = MemRecoveryRepo::default();
        let notifier = MemNotifier::default();

        let err = use_case(&repo, &notifier)
            .execute(
                RequestCodeInput {
                    email: "   ".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::Validation(_)));
    }

    #[tokio::test]
    async fn repeated_requests_hit_the_rate_limit() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let use_case = use_case(&repo, &notifier);

        for _ in 0..5 {
            use_case
                .execute(
                    RequestCodeInput {
                        email: "ama@example.com".to_string(),
                    },
                    fingerprint(),
                )
                .await
                .unwrap();
        }

        let err = use_case
            .execute(
                RequestCodeInput {
                    email: "ama@example.com".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::RateLimited));
        assert_eq!(notifier.sent_count(), 5);
    }

    #[tokio::test]
    async fn delivery_failure_is_surfaced() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        notifier.fail.store(true, Ordering::SeqCst);

        let err = use_case(&repo, &notifier)
            .execute(
                RequestCodeInput {
                    email: "ama@example.com".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::DeliveryFailed(_)));
        assert!(repo.inner.flows.lock().unwrap().is_empty());
    }
}

mod verify_tests {
    use super::support::{MemNotifier, MemRecoveryRepo, fingerprint, other_fingerprint};
    use crate::application::config::RecoveryConfig;
    use crate::application::request_code::{RequestCodeInput, RequestCodeUseCase};
    use crate::application::verify_code::{VerifyCodeInput, VerifyCodeUseCase};
    use crate::domain::entities::RecoveryStep;
    use crate::error::RecoveryError;
    use std::sync::Arc;
    use uuid::Uuid;

    pub async fn started_flow(
        repo: &MemRecoveryRepo,
        notifier: &MemNotifier,
        config: &Arc<RecoveryConfig>,
    ) -> Uuid {
        let use_case = RequestCodeUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(notifier.clone()),
            config.clone(),
        );
        use_case
            .execute(
                RequestCodeInput {
                    email: "ama@example.com".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap()
            .flow_id
    }

    fn verify(
        repo: &MemRecoveryRepo,
        config: &Arc<RecoveryConfig>,
    ) -> VerifyCodeUseCase<MemRecoveryRepo> {
        VerifyCodeUseCase::new(Arc::new(repo.clone()), config.clone())
    }

    #[tokio::test]
    async fn correct_code_unlocks_the_password_step() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        let output = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                fingerprint(),
            )
            .await
            .unwrap();

        assert_eq!(output.step, RecoveryStep::ResetPassword);
    }

    #[tokio::test]
    async fn verify_without_a_flow_is_not_found() {
        let repo = MemRecoveryRepo::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());

        let err = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id: Uuid::new_v4(),
                    code: "123456".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::FlowNotFound));
    }

    #[tokio::test]
    async fn malformed_code_is_rejected_before_lookup() {
        let repo = MemRecoveryRepo::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());

        let err = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id: Uuid::new_v4(),
                    code: "12-456".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::CodeInvalid));
        assert_eq!(repo.flow_reads(), 0);
    }

    #[tokio::test]
    async fn foreign_client_cannot_verify() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        let err = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                other_fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::FingerprintMismatch));
    }

    #[tokio::test]
    async fn wrong_codes_burn_the_flow_after_five_attempts() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        let wrong = if notifier.last_code() == "000000" {
            "000001".to_string()
        } else {
            "000000".to_string()
        };

        for attempt in 1..=5 {
            let err = verify(&repo, &config)
                .execute(
                    VerifyCodeInput {
                        flow_id,
                        code: wrong.clone(),
                    },
                    fingerprint(),
                )
                .await
                .unwrap_err();

            if attempt < 5 {
                assert!(matches!(err, RecoveryError::CodeInvalid));
            } else {
                assert!(matches!(err, RecoveryError::TooManyAttempts));
            }
        }

        // The flow is gone; even the correct code no longer works
        assert!(repo.inner.flows.lock().unwrap().is_empty());
        let err = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::FlowNotFound));
    }

    #[tokio::test]
    async fn expired_code_is_gone() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        repo.rewind(flow_id, |flow| flow.code_expires_at_ms = 0);

        let err = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::CodeExpired));
    }

    #[tokio::test]
    async fn expired_flow_is_deleted_on_contact() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        repo.rewind(flow_id, |flow| flow.expires_at_ms = 0);

        let err = verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::FlowExpired));
        assert!(repo.inner.flows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn verifying_twice_is_a_step_conflict() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;
        let code = notifier.last_code();

        verify(&repo, &config)
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: code.clone(),
                },
                fingerprint(),
            )
            .await
            .unwrap();

        let err = verify(&repo, &config)
            .execute(VerifyCodeInput { flow_id, code }, fingerprint())
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::InvalidStep));
    }
}

mod reset_tests {
    use super::support::{MemNotifier, MemRecoveryRepo, fingerprint};
    use super::verify_tests::started_flow;
    use crate::application::config::RecoveryConfig;
    use crate::application::reset_password::{ResetPasswordInput, ResetPasswordUseCase};
    use crate::application::verify_code::{VerifyCodeInput, VerifyCodeUseCase};
    use crate::error::RecoveryError;
    use platform::password::{ClearTextPassword, HashedPassword};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use uuid::Uuid;

    fn reset(
        repo: &MemRecoveryRepo,
        config: &Arc<RecoveryConfig>,
    ) -> ResetPasswordUseCase<MemRecoveryRepo, MemRecoveryRepo> {
        ResetPasswordUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()), config.clone())
    }

    async fn verified_flow(
        repo: &MemRecoveryRepo,
        notifier: &MemNotifier,
        config: &Arc<RecoveryConfig>,
    ) -> Uuid {
        let flow_id = started_flow(repo, notifier, config).await;
        VerifyCodeUseCase::new(Arc::new(repo.clone()), config.clone())
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                fingerprint(),
            )
            .await
            .unwrap();
        flow_id
    }

    #[tokio::test]
    async fn mismatch_is_rejected_before_any_repository_access() {
        let repo = MemRecoveryRepo::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());

        let err = reset(&repo, &config)
            .execute(
                ResetPasswordInput {
                    flow_id: Uuid::new_v4(),
                    new_password: "CorrectHorse9!".to_string(),
                    confirm_password: "CorrectHorse8!".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::PasswordMismatch));
        assert_eq!(repo.flow_reads(), 0);
        assert!(repo.inner.password_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn weak_password_fails_policy_before_lookup() {
        let repo = MemRecoveryRepo::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());

        let err = reset(&repo, &config)
            .execute(
                ResetPasswordInput {
                    flow_id: Uuid::new_v4(),
                    new_password: "short".to_string(),
                    confirm_password: "short".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::PasswordValidation(_)));
        assert_eq!(repo.flow_reads(), 0);
    }

    #[tokio::test]
    async fn reset_before_verify_is_a_step_conflict() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        let err = reset(&repo, &config)
            .execute(
                ResetPasswordInput {
                    flow_id,
                    new_password: "CorrectHorse9!".to_string(),
                    confirm_password: "CorrectHorse9!".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::InvalidStep));
        assert!(repo.inner.password_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn completed_reset_stores_a_verifiable_hash_and_burns_the_flow() {
        let (repo, user_id) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = verified_flow(&repo, &notifier, &config).await;

        let output = reset(&repo, &config)
            .execute(
                ResetPasswordInput {
                    flow_id,
                    new_password: "CorrectHorse9!".to_string(),
                    confirm_password: "CorrectHorse9!".to_string(),
                },
                fingerprint(),
            )
            .await
            .unwrap();

        assert_eq!(output.redirect_to, "/login");

        let writes = repo.inner.password_writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, user_id);

        let stored = HashedPassword::from_phc_string(writes[0].1.clone()).unwrap();
        let password = ClearTextPassword::new("CorrectHorse9!".to_string()).unwrap();
        assert!(stored.verify(&password, config.pepper()));

        assert_eq!(repo.inner.revoked_sessions.load(Ordering::SeqCst), 1);
        assert!(repo.inner.flows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn a_burned_flow_cannot_be_reset_again() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = verified_flow(&repo, &notifier, &config).await;

        let input = || ResetPasswordInput {
            flow_id,
            new_password: "CorrectHorse9!".to_string(),
            confirm_password: "CorrectHorse9!".to_string(),
        };

        reset(&repo, &config).execute(input(), fingerprint()).await.unwrap();

        let err = reset(&repo, &config)
            .execute(input(), fingerprint())
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::FlowNotFound));
    }
}

mod resend_tests {
    use super::support::{MemNotifier, MemRecoveryRepo, fingerprint};
    use super::verify_tests::started_flow;
    use crate::application::config::RecoveryConfig;
    use crate::application::resend_code::{ResendCodeInput, ResendCodeUseCase};
    use crate::application::verify_code::{VerifyCodeInput, VerifyCodeUseCase};
    use crate::error::RecoveryError;
    use std::sync::Arc;

    fn resend(
        repo: &MemRecoveryRepo,
        notifier: &MemNotifier,
        config: &Arc<RecoveryConfig>,
    ) -> ResendCodeUseCase<MemRecoveryRepo, MemRecoveryRepo, MemNotifier> {
        ResendCodeUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(notifier.clone()),
            config.clone(),
        )
    }

    #[tokio::test]
    async fn resend_inside_the_cooldown_is_throttled() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        let err = resend(&repo, &notifier, &config)
            .execute(ResendCodeInput { flow_id }, fingerprint())
            .await
            .unwrap_err();

        match err {
            RecoveryError::ResendThrottled { retry_in_secs } => {
                assert!(retry_in_secs > 0 && retry_in_secs <= 60);
            }
            other => panic!("expected ResendThrottled, got {other:?}"),
        }
        assert_eq!(notifier.sent_count(), 1);
    }

    #[tokio::test]
    async fn resend_after_the_cooldown_replaces_the_code() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;
        let first_code = notifier.last_code();

        repo.rewind(flow_id, |flow| flow.resend_available_at_ms = 0);

        let output = resend(&repo, &notifier, &config)
            .execute(ResendCodeInput { flow_id }, fingerprint())
            .await
            .unwrap();

        assert_eq!(notifier.sent_count(), 2);
        assert!(output.resend_available_at_ms > 0);

        // The old code is dead unless the provider happened to repeat it
        let second_code = notifier.last_code();
        if second_code != first_code {
            let err = VerifyCodeUseCase::new(Arc::new(repo.clone()), config.clone())
                .execute(
                    VerifyCodeInput {
                        flow_id,
                        code: first_code,
                    },
                    fingerprint(),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, RecoveryError::CodeInvalid));
        }

        // The fresh code works
        VerifyCodeUseCase::new(Arc::new(repo.clone()), config.clone())
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: second_code,
                },
                fingerprint(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn resend_after_verification_is_a_step_conflict() {
        let (repo, _) = MemRecoveryRepo::with_account("ama@example.com", "Ama");
        let notifier = MemNotifier::default();
        let config = Arc::new(RecoveryConfig::with_random_secret());
        let flow_id = started_flow(&repo, &notifier, &config).await;

        VerifyCodeUseCase::new(Arc::new(repo.clone()), config.clone())
            .execute(
                VerifyCodeInput {
                    flow_id,
                    code: notifier.last_code(),
                },
                fingerprint(),
            )
            .await
            .unwrap();

        repo.rewind(flow_id, |flow| flow.resend_available_at_ms = 0);

        let err = resend(&repo, &notifier, &config)
            .execute(ResendCodeInput { flow_id }, fingerprint())
            .await
            .unwrap_err();

        assert!(matches!(err, RecoveryError::InvalidStep));
    }
}

mod error_tests {
    use crate::error::RecoveryError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn status_codes_match_response_status() {
        let cases = [
            (RecoveryError::UnknownEmail, StatusCode::NOT_FOUND),
            (RecoveryError::FlowNotFound, StatusCode::NOT_FOUND),
            (RecoveryError::FlowExpired, StatusCode::GONE),
            (RecoveryError::InvalidStep, StatusCode::CONFLICT),
            (RecoveryError::CodeInvalid, StatusCode::BAD_REQUEST),
            (RecoveryError::CodeExpired, StatusCode::GONE),
            (RecoveryError::TooManyAttempts, StatusCode::TOO_MANY_REQUESTS),
            (
                RecoveryError::ResendThrottled { retry_in_secs: 42 },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (RecoveryError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (RecoveryError::PasswordMismatch, StatusCode::BAD_REQUEST),
            (RecoveryError::FingerprintMismatch, StatusCode::FORBIDDEN),
            (
                RecoveryError::DeliveryFailed("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RecoveryError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn throttle_message_names_the_wait() {
        let err = RecoveryError::ResendThrottled { retry_in_secs: 42 };
        assert!(err.to_string().contains("42"));
    }
}
