//! Mutation pipeline: notify, persist, then index
//!
//! No lock is held while hooks run. The repository call and the index update
//! for one id run under that id's commit lock, so a delete cannot slip in
//! between a save's commit and its index update. The index is touched only
//! after the repository confirms the write.

use crate::{RelationshipService, ServiceFailure};
use concord_domain::{HookDecision, Relationship, RelationshipEvent, RelationshipId, RelationshipRepository};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Number of commit lock stripes (power of 2 for fast modulo)
const COMMIT_STRIPES: usize = 16;

/// Striped locks pairing each repository write with its index update
pub(crate) struct CommitLocks {
    stripes: Vec<Mutex<()>>,
}

impl CommitLocks {
    pub(crate) fn new() -> Self {
        Self {
            stripes: (0..COMMIT_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Lock the stripe owning `id`
    fn lock(&self, id: RelationshipId) -> MutexGuard<'_, ()> {
        // UUIDv7 low bits are random
        let stripe = (id.value() as usize) & (COMMIT_STRIPES - 1);
        self.stripes[stripe].lock()
    }
}

impl<R: RelationshipRepository> RelationshipService<R> {
    /// Create or replace a relationship
    ///
    /// Creation (an identifier the index has not seen) is announced to the
    /// hooks first and may be cancelled. The repository checks the version
    /// marker; a mismatch is returned as a conflict failure.
    pub fn save(&self, relationship: Relationship) -> Result<Relationship, ServiceFailure> {
        let id = relationship.id;

        if self.store.get(id).is_none() {
            let event = RelationshipEvent::Create {
                relationship_id: id,
                relationship: relationship.clone(),
                is_async: self.is_async_caller(),
            };
            self.notify(&event)?;
        }

        let _commit = self.commit_locks.lock(id);
        let committed = self.repository.upsert(relationship).map_err(|err| {
            warn!(relationship = %id, "Failed to save relationship: {}", err);
            ServiceFailure::from(err)
        })?;

        if !self.store.apply_committed(committed.clone()) {
            debug!(
                relationship = %id,
                version = committed.version,
                "Newer revision already indexed"
            );
        }
        debug!(
            relationship = %id,
            faction = %committed.faction_id,
            target = %committed.target_id,
            kind = %committed.relationship_type,
            version = committed.version,
            "Relationship saved"
        );
        Ok(committed)
    }

    /// Delete a relationship by identifier
    ///
    /// The deletion is announced to the hooks first and may be cancelled.
    pub fn delete(&self, id: RelationshipId) -> Result<(), ServiceFailure> {
        let event = RelationshipEvent::Delete {
            relationship_id: id,
            is_async: self.is_async_caller(),
        };
        self.notify(&event)?;

        let _commit = self.commit_locks.lock(id);
        self.repository.delete(id).map_err(|err| {
            warn!(relationship = %id, "Failed to delete relationship: {}", err);
            ServiceFailure::from(err)
        })?;

        self.store.remove(id);
        debug!(relationship = %id, "Relationship deleted");
        Ok(())
    }

    fn notify(&self, event: &RelationshipEvent) -> Result<(), ServiceFailure> {
        match self.hooks.dispatch(event) {
            HookDecision::Continue => Ok(()),
            HookDecision::Cancel(reason) => {
                info!(
                    relationship = %event.relationship_id(),
                    event = event.kind(),
                    "Relationship {} cancelled by hook: {}",
                    event.kind(),
                    reason
                );
                Err(ServiceFailure::cancelled(reason))
            }
        }
    }
}
