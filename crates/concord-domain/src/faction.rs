//! Faction identity
//!
//! The faction data model (members, roles, flags) is owned elsewhere; the
//! relationship layer only ever sees the identifier.

use crate::id::uuid_id;

uuid_id!(
    /// Unique identifier for a faction
    ///
    /// # Examples
    ///
    /// ```
    /// use concord_domain::FactionId;
    ///
    /// let id = FactionId::new();
    /// let parsed = FactionId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    FactionId,
    "faction"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = FactionId::new();
        let b = FactionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_string_rejects_garbage() {
        let result = FactionId::from_string("not-a-faction");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid faction id"));
    }
}
