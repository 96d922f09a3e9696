//! Pre-commit notifications
//!
//! Events are delivered to hooks before a mutation reaches the repository.
//! Hooks answer with a [`HookDecision`] instead of flipping a shared flag.

use crate::{Relationship, RelationshipId};

/// Notification emitted before a relationship mutation is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipEvent {
    /// A relationship with a previously unseen identifier is about to be created
    Create {
        /// Identifier of the candidate relationship
        relationship_id: RelationshipId,
        /// The candidate relationship
        relationship: Relationship,
        /// True when the caller is not on the primary thread
        is_async: bool,
    },

    /// A relationship is about to be deleted
    Delete {
        /// Identifier of the relationship being deleted
        relationship_id: RelationshipId,
        /// True when the caller is not on the primary thread
        is_async: bool,
    },
}

impl RelationshipEvent {
    /// Identifier of the relationship this event concerns
    pub fn relationship_id(&self) -> RelationshipId {
        match self {
            RelationshipEvent::Create {
                relationship_id, ..
            }
            | RelationshipEvent::Delete {
                relationship_id, ..
            } => *relationship_id,
        }
    }

    /// Candidate payload (creation events only)
    pub fn relationship(&self) -> Option<&Relationship> {
        match self {
            RelationshipEvent::Create { relationship, .. } => Some(relationship),
            RelationshipEvent::Delete { .. } => None,
        }
    }

    /// Whether the mutation was invoked off the primary thread
    pub fn is_async(&self) -> bool {
        match self {
            RelationshipEvent::Create { is_async, .. }
            | RelationshipEvent::Delete { is_async, .. } => *is_async,
        }
    }

    /// Short name used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            RelationshipEvent::Create { .. } => "create",
            RelationshipEvent::Delete { .. } => "delete",
        }
    }
}

/// A hook's answer to a [`RelationshipEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HookDecision {
    /// Let the mutation proceed
    #[default]
    Continue,

    /// Veto the mutation, with a reason
    Cancel(String),
}

impl HookDecision {
    /// Whether this decision vetoes the mutation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HookDecision::Cancel(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FactionId, RelationshipType};

    #[test]
    fn test_create_event_accessors() {
        let rel = Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::Ally);
        let event = RelationshipEvent::Create {
            relationship_id: rel.id,
            relationship: rel.clone(),
            is_async: true,
        };

        assert_eq!(event.relationship_id(), rel.id);
        assert_eq!(event.relationship(), Some(&rel));
        assert!(event.is_async());
        assert_eq!(event.kind(), "create");
    }

    #[test]
    fn test_delete_event_has_no_payload() {
        let id = RelationshipId::new();
        let event = RelationshipEvent::Delete {
            relationship_id: id,
            is_async: false,
        };

        assert_eq!(event.relationship_id(), id);
        assert!(event.relationship().is_none());
        assert!(!event.is_async());
    }

    #[test]
    fn test_default_decision_continues() {
        assert!(!HookDecision::default().is_cancelled());
        assert!(HookDecision::Cancel("no".into()).is_cancelled());
    }
}
