//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the relationship service and
//! its collaborators. Implementations live in other crates.

use crate::{HookDecision, Relationship, RelationshipEvent, RelationshipId, RepositoryError};

/// Durable storage for relationship records
///
/// Implemented by the infrastructure layer (concord-store). Implementations
/// are shared between threads, so every method takes `&self`.
///
/// # Optimistic locking
///
/// `upsert` must compare the submitted `version` against the stored one and
/// fail with [`RepositoryError::Conflict`] when they differ. The committed
/// record carries the next version.
pub trait RelationshipRepository: Send + Sync {
    /// Load every stored relationship, oldest first
    fn list_all(&self) -> Result<Vec<Relationship>, RepositoryError>;

    /// Insert or replace a relationship keyed by its identifier
    fn upsert(&self, relationship: Relationship) -> Result<Relationship, RepositoryError>;

    /// Delete a relationship by identifier
    fn delete(&self, id: RelationshipId) -> Result<(), RepositoryError>;
}

/// Observer consulted before a mutation is committed
///
/// Hooks may query the relationship service from inside `before_commit`.
pub trait RelationshipHook: Send + Sync {
    /// Inspect a pending mutation and decide whether it may proceed
    fn before_commit(&self, event: &RelationshipEvent) -> HookDecision;
}

impl<F> RelationshipHook for F
where
    F: Fn(&RelationshipEvent) -> HookDecision + Send + Sync,
{
    fn before_commit(&self, event: &RelationshipEvent) -> HookDecision {
        self(event)
    }
}
