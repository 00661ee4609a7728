//! User Entity
//!
//! Core account profile entity containing non-sensitive data.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, geo_point::GeoPoint, phone::Phone, public_id::PublicId, user_id::UserId,
    user_role::UserRole, user_status::UserStatus,
};

/// User entity
///
/// Contains the marketplace account profile. Sensitive credential data
/// lives in the Credential entity, vendor business details in
/// VendorProfile.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Display name shown across the marketplace
    pub display_name: String,
    /// Login email (unique)
    pub email: Email,
    /// Contact phone number
    pub phone: Phone,
    /// Role (User, Vendor, SuperAdmin)
    pub role: UserRole,
    /// Status (Active, Disabled)
    pub status: UserStatus,
    /// Delivery/pickup location captured at registration
    pub location: GeoPoint,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        display_name: String,
        email: Email,
        phone: Phone,
        role: UserRole,
        location: GeoPoint,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            display_name,
            email,
            phone,
            role,
            status: UserStatus::default(),
            location,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check if user can login
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Update account status
    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
