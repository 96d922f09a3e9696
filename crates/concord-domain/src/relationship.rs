//! Relationship module - directed diplomatic edges between factions

use crate::id::uuid_id;
use crate::FactionId;
use std::fmt;

uuid_id!(
    /// Unique identifier for a relationship record
    RelationshipId,
    "relationship"
);

/// Type of a directed relationship edge
///
/// The edge `A -> B` reads as "A declares B to be its ...":
/// - `Ally`: A declares B an ally
/// - `AtWar`: A declares war on B
/// - `Liege`: A declares B its liege (A is the subordinate)
/// - `Vassal`: A declares B its vassal (A is the overlord)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// Alliance claim
    Ally,

    /// Declaration of war
    AtWar,

    /// Subordination claim pointing at the overlord
    Liege,

    /// Overlordship claim pointing at the subordinate
    Vassal,
}

impl RelationshipType {
    /// Canonical storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Ally => "ALLY",
            RelationshipType::AtWar => "AT_WAR",
            RelationshipType::Liege => "LIEGE",
            RelationshipType::Vassal => "VASSAL",
        }
    }

    /// Parse a relationship type from its storage name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ALLY" => Some(RelationshipType::Ally),
            "AT_WAR" => Some(RelationshipType::AtWar),
            "LIEGE" => Some(RelationshipType::Liege),
            "VASSAL" => Some(RelationshipType::Vassal),
            _ => None,
        }
    }

    /// The type the other side must record for this edge to be binding
    ///
    /// War needs no acknowledgement, so it has no counterpart.
    pub fn reciprocal(&self) -> Option<Self> {
        match self {
            RelationshipType::Ally => Some(RelationshipType::Ally),
            RelationshipType::Liege => Some(RelationshipType::Vassal),
            RelationshipType::Vassal => Some(RelationshipType::Liege),
            RelationshipType::AtWar => None,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship edge between two factions
///
/// Records are replaced wholesale on update; `version` is the optimistic
/// locking marker owned by the repository. A record that has never been
/// committed carries version `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique identifier, immutable once created
    pub id: RelationshipId,

    /// Faction that declares the relationship
    pub faction_id: FactionId,

    /// Faction the declaration points at
    pub target_id: FactionId,

    /// Type of relationship
    pub relationship_type: RelationshipType,

    /// Optimistic locking revision
    pub version: u64,
}

impl Relationship {
    /// Create a new, uncommitted relationship with a fresh identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use concord_domain::{FactionId, Relationship, RelationshipType};
    ///
    /// let rel = Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::Ally);
    /// assert_eq!(rel.version, 0);
    /// ```
    pub fn new(
        faction_id: FactionId,
        target_id: FactionId,
        relationship_type: RelationshipType,
    ) -> Self {
        Self::with_id(RelationshipId::new(), faction_id, target_id, relationship_type)
    }

    /// Create a new, uncommitted relationship with a caller-assigned identifier
    pub fn with_id(
        id: RelationshipId,
        faction_id: FactionId,
        target_id: FactionId,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id,
            faction_id,
            target_id,
            relationship_type,
            version: 0,
        }
    }

    /// Whether this edge goes from `faction_id` to `target_id`
    pub fn connects(&self, faction_id: FactionId, target_id: FactionId) -> bool {
        self.faction_id == faction_id && self.target_id == target_id
    }

    /// Whether this edge touches `faction_id` on either end
    pub fn involves(&self, faction_id: FactionId) -> bool {
        self.faction_id == faction_id || self.target_id == faction_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_storage_names() {
        for ty in [
            RelationshipType::Ally,
            RelationshipType::AtWar,
            RelationshipType::Liege,
            RelationshipType::Vassal,
        ] {
            assert_eq!(RelationshipType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(RelationshipType::parse("at_war"), Some(RelationshipType::AtWar));
        assert_eq!(RelationshipType::parse("NEUTRAL"), None);
    }

    #[test]
    fn test_reciprocal_types() {
        assert_eq!(RelationshipType::Vassal.reciprocal(), Some(RelationshipType::Liege));
        assert_eq!(RelationshipType::Liege.reciprocal(), Some(RelationshipType::Vassal));
        assert_eq!(RelationshipType::Ally.reciprocal(), Some(RelationshipType::Ally));
        assert_eq!(RelationshipType::AtWar.reciprocal(), None);
    }

    #[test]
    fn test_relationship_id_parsing() {
        let id = RelationshipId::new();
        assert_eq!(RelationshipId::from_string(&id.to_string()), Ok(id));
        assert!(RelationshipId::from_string("1234").is_err());
    }

    #[test]
    fn test_new_relationship_is_uncommitted() {
        let id = RelationshipId::from_value(42);
        let rel = Relationship::with_id(id, FactionId::new(), FactionId::new(), RelationshipType::Liege);
        assert_eq!(rel.id.value(), 42);
        assert_eq!(rel.version, 0);
    }

    #[test]
    fn test_edge_direction() {
        let a = FactionId::new();
        let b = FactionId::new();
        let rel = Relationship::new(a, b, RelationshipType::Vassal);

        assert!(rel.connects(a, b));
        assert!(!rel.connects(b, a));
        assert!(rel.involves(a));
        assert!(rel.involves(b));
        assert!(!rel.involves(FactionId::new()));
    }
}
