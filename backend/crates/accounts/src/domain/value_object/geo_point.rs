//! GeoPoint Value Object
//!
//! Location attached to an account at registration. Browser geolocation
//! is optional on the client, so a registration may arrive without
//! coordinates; in that case the marketplace pins the account to the
//! default pickup region.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default region used when the client never captured a location
const FALLBACK_LAT: f64 = 5.6037;
const FALLBACK_LNG: f64 = -0.1870;
const FALLBACK_ADDRESS: &str = "Accra, Ghana";

/// Geographic point with a human-readable address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
    address: String,
}

impl GeoPoint {
    /// Create a validated point
    ///
    /// Latitude must be within [-90, 90] and longitude within
    /// [-180, 180].
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> AppResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::bad_request(format!(
                "Latitude out of range: {}",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::bad_request(format!(
                "Longitude out of range: {}",
                lng
            )));
        }

        Ok(Self {
            lat,
            lng,
            address: address.into(),
        })
    }

    /// Default region for accounts registered without a captured location
    pub fn fallback() -> Self {
        Self {
            lat: FALLBACK_LAT,
            lng: FALLBACK_LNG,
            address: FALLBACK_ADDRESS.to_string(),
        }
    }

    /// Build from optional client-supplied parts, falling back to the
    /// default region when any part is missing
    pub fn from_parts(
        lat: Option<f64>,
        lng: Option<f64>,
        address: Option<String>,
    ) -> AppResult<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => {
                let address = address.unwrap_or_else(|| format!("{}, {}", lat, lng));
                Self::new(lat, lng, address)
            }
            _ => Ok(Self::fallback()),
        }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let point = GeoPoint::new(5.6037, -0.1870, "Accra, Ghana").unwrap();
        assert_eq!(point.lat(), 5.6037);
        assert_eq!(point.lng(), -0.1870);
        assert_eq!(point.address(), "Accra, Ghana");
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeoPoint::new(91.0, 0.0, "nowhere").is_err());
        assert!(GeoPoint::new(0.0, -181.0, "nowhere").is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0, "nowhere").is_err());
    }

    #[test]
    fn test_fallback_region() {
        let point = GeoPoint::fallback();
        assert_eq!(point.address(), "Accra, Ghana");
        assert_eq!(point.lat(), 5.6037);
        assert_eq!(point.lng(), -0.1870);
    }

    #[test]
    fn test_from_parts_missing_coordinates_uses_fallback() {
        let point = GeoPoint::from_parts(None, None, None).unwrap();
        assert_eq!(point, GeoPoint::fallback());

        let point = GeoPoint::from_parts(Some(1.0), None, None).unwrap();
        assert_eq!(point, GeoPoint::fallback());
    }

    #[test]
    fn test_from_parts_missing_address_synthesized() {
        let point = GeoPoint::from_parts(Some(6.7), Some(-1.6), None).unwrap();
        assert_eq!(point.address(), "6.7, -1.6");
    }
}
