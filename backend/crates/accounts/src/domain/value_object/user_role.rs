use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace account role
///
/// `SuperAdmin` accounts are provisioned operationally and can never be
/// self-assigned through registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserRole {
    /// Buyer account
    #[default]
    User = 0,
    /// Vendor (shop owner) account
    Vendor = 1,
    /// Platform administrator
    SuperAdmin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Wire/cookie representation of the role
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Vendor => "vendor",
            SuperAdmin => "super-admin",
        }
    }

    /// The dashboard path this role lands on after login or redirect
    #[inline]
    pub const fn dashboard_path(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "/dashboard",
            Vendor => "/vendor/dashboard",
            SuperAdmin => "/super-admin/dashboard",
        }
    }

    #[inline]
    pub const fn is_vendor(&self) -> bool {
        matches!(self, UserRole::Vendor)
    }

    #[inline]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }

    /// Parse a stored role id; `None` for unknown values
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(User),
            1 => Some(Vendor),
            2 => Some(SuperAdmin),
            _ => None,
        }
    }

    /// Parse a role code; `None` for unknown values
    ///
    /// Callers that gate access must treat `None` as "deny".
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "user" => Some(User),
            "vendor" => Some(Vendor),
            "super-admin" => Some(SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
