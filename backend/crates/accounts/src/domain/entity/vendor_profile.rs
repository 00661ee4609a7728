//! Vendor Profile Entity
//!
//! Business details attached to vendor accounts. A row exists only for
//! users registered with the vendor role.

use chrono::{DateTime, Utc};

use crate::domain::value_object::user_id::UserId;

/// Vendor business profile
#[derive(Debug, Clone)]
pub struct VendorProfile {
    /// Reference to User
    pub user_id: UserId,
    /// Storefront name shown to buyers
    pub business_name: String,
    /// Short description of what the vendor sells
    pub business_description: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl VendorProfile {
    /// Create a new vendor profile
    pub fn new(user_id: UserId, business_name: String, business_description: String) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            business_name,
            business_description,
            created_at: now,
            updated_at: now,
        }
    }
}
