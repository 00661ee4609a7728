use kernel::id::Id;

/// Marker type for [`UserId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMarker;

/// Internal user identifier (UUID v4). Never exposed over the API;
/// external callers see [`PublicId`](super::PublicId) instead.
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_is_unique() {
        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_id_uuid_roundtrip() {
        let id = UserId::new();
        let uuid = *id.as_uuid();
        assert_eq!(UserId::from_uuid(uuid), id);
    }
}
