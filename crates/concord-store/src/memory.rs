//! In-memory relationship repository
//!
//! Shares the optimistic locking rules of the SQLite repository.

use crate::next_revision;
use concord_domain::{Relationship, RelationshipId, RelationshipRepository, RepositoryError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Thread-safe in-memory `RelationshipRepository`
///
/// Records are kept in insertion order. Clones share the same storage, so a
/// test can hand one clone to the service and inspect another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRelationshipRepository {
    records: Arc<Mutex<Vec<Relationship>>>,
}

impl InMemoryRelationshipRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with committed records
    ///
    /// Records are stored as given, versions included.
    pub fn with_records(records: Vec<Relationship>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Look up a stored record directly
    pub fn stored(&self, id: RelationshipId) -> Option<Relationship> {
        self.records.lock().iter().find(|r| r.id == id).cloned()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether the repository holds no records
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RelationshipRepository for InMemoryRelationshipRepository {
    fn list_all(&self) -> Result<Vec<Relationship>, RepositoryError> {
        Ok(self.records.lock().clone())
    }

    fn upsert(&self, relationship: Relationship) -> Result<Relationship, RepositoryError> {
        let mut records = self.records.lock();
        let position = records.iter().position(|r| r.id == relationship.id);
        let committed = next_revision(relationship, position.map(|i| records[i].version))?;

        match position {
            Some(i) => records[i] = committed.clone(),
            None => records.push(committed.clone()),
        }
        Ok(committed)
    }

    fn delete(&self, id: RelationshipId) -> Result<(), RepositoryError> {
        let mut records = self.records.lock();
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        records.remove(position);
        Ok(())
    }
}
