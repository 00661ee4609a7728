//! Register Use Case
//!
//! Validates a registration submission and persists the new account.
//! Validation is staged: form-level checks (missing fields, password
//! confirmation, terms, role) run before any value-object parsing, and
//! no repository call happens until every check has passed.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::entity::{credential::Credential, user::User, vendor_profile::VendorProfile};
use crate::domain::repository::{CredentialRepository, UserRepository, VendorProfileRepository};
use crate::domain::value_object::{
    email::Email,
    geo_point::GeoPoint,
    phone::Phone,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AccountError, AccountResult};

/// Register input
pub struct RegisterInput {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Password
    pub password: String,
    /// Password confirmation (must match exactly)
    pub confirm_password: String,
    /// Requested role code ("user" or "vendor")
    pub role: String,
    /// Vendor storefront name
    pub business_name: Option<String>,
    /// Vendor storefront description
    pub business_description: Option<String>,
    /// Captured latitude, if the client obtained one
    pub location_lat: Option<f64>,
    /// Captured longitude
    pub location_lng: Option<f64>,
    /// Human-readable address
    pub location_address: Option<String>,
    /// Terms-of-service checkbox
    pub agree_to_terms: bool,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    /// Public ID of the created account
    pub public_id: String,
    /// Dashboard path for the created role, for client-side navigation
    pub redirect_to: &'static str,
}

/// Register use case
pub struct RegisterUseCase<U, V, C>
where
    U: UserRepository,
    V: VendorProfileRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    vendor_repo: Arc<V>,
    credential_repo: Arc<C>,
    config: Arc<AccountConfig>,
}

impl<U, V, C> RegisterUseCase<U, V, C>
where
    U: UserRepository,
    V: VendorProfileRepository,
    C: CredentialRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        vendor_repo: Arc<V>,
        credential_repo: Arc<C>,
        config: Arc<AccountConfig>,
    ) -> Self {
        Self {
            user_repo,
            vendor_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<RegisterOutput> {
        // Form-level checks first. Nothing below touches a repository
        // until all of these pass.
        Self::require_field("name", &input.name)?;
        Self::require_field("email", &input.email)?;
        Self::require_field("phone", &input.phone)?;
        Self::require_field("password", &input.password)?;
        Self::require_field("confirm password", &input.confirm_password)?;

        if input.password != input.confirm_password {
            return Err(AccountError::PasswordMismatch);
        }

        if !input.agree_to_terms {
            return Err(AccountError::TermsNotAccepted);
        }

        // Only buyer and vendor roles may self-register. "super-admin"
        // (and anything unknown) is rejected here.
        let role = match UserRole::from_code(&input.role) {
            Some(role) if !role.is_super_admin() => role,
            _ => return Err(AccountError::InvalidRole(input.role.clone())),
        };

        let vendor_fields = if role.is_vendor() {
            let business_name = input.business_name.as_deref().unwrap_or("").trim();
            if business_name.is_empty() {
                return Err(AccountError::MissingField("business name"));
            }
            let business_description =
                input.business_description.as_deref().unwrap_or("").trim();
            if business_description.is_empty() {
                return Err(AccountError::MissingField("business description"));
            }
            Some((business_name.to_string(), business_description.to_string()))
        } else {
            None
        };

        // Value-object parsing: format and policy checks.
        let email = Email::new(&input.email)
            .map_err(|e| AccountError::Validation(e.message().to_string()))?;
        let phone = Phone::new(&input.phone)
            .map_err(|e| AccountError::Validation(e.message().to_string()))?;
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AccountError::PasswordValidation(e.message().to_string()))?;
        let location = GeoPoint::from_parts(
            input.location_lat,
            input.location_lng,
            input.location_address,
        )
        .map_err(|e| AccountError::Validation(e.message().to_string()))?;

        // Uniqueness check is the first repository call.
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AccountError::Internal(e.message().to_string()))?;

        let user = User::new(input.name.trim().to_string(), email, phone, role, location);
        self.user_repo.create(&user).await?;

        let credential = Credential::new(user.user_id, password_hash);
        self.credential_repo.create(&credential).await?;

        if let Some((business_name, business_description)) = vendor_fields {
            let profile = VendorProfile::new(user.user_id, business_name, business_description);
            self.vendor_repo.create(&profile).await?;
        }

        tracing::info!(
            public_id = %user.public_id,
            role = %user.role,
            "Account registered"
        );

        Ok(RegisterOutput {
            public_id: user.public_id.to_string(),
            redirect_to: role.dashboard_path(),
        })
    }

    fn require_field(name: &'static str, value: &str) -> AccountResult<()> {
        if value.trim().is_empty() {
            return Err(AccountError::MissingField(name));
        }
        Ok(())
    }
}
