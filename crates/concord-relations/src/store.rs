//! In-memory relationship index
//!
//! Owns the authoritative in-memory copies. Every read returns a clone; every
//! write replaces a whole entry.

use concord_domain::{Relationship, RelationshipId};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Index {
    entries: HashMap<RelationshipId, Entry>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry {
    /// Position in first-recorded order, kept across replacements
    seq: u64,
    relationship: Relationship,
}

/// Thread-safe keyed container of committed relationships
#[derive(Debug, Default)]
pub struct RelationshipStore {
    index: RwLock<Index>,
}

impl RelationshipStore {
    /// Build a store from records in first-recorded order
    pub fn from_records(records: Vec<Relationship>) -> Self {
        let store = Self::default();
        {
            let mut index = store.index.write();
            for relationship in records {
                Self::insert_locked(&mut index, relationship);
            }
        }
        store
    }

    /// Point lookup
    pub fn get(&self, id: RelationshipId) -> Option<Relationship> {
        self.index
            .read()
            .entries
            .get(&id)
            .map(|entry| entry.relationship.clone())
    }

    /// Snapshot of every relationship in first-recorded order
    pub fn list(&self) -> Vec<Relationship> {
        let mut entries: Vec<Entry> = self.index.read().entries.values().cloned().collect();
        entries.sort_unstable_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.relationship).collect()
    }

    /// Number of indexed relationships
    pub fn len(&self) -> usize {
        self.index.read().entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.read().entries.is_empty()
    }

    /// Install a repository-committed record
    ///
    /// A record older than the one already indexed is ignored, so a slower
    /// writer cannot overwrite a newer commit for the same id. Returns whether
    /// the record was applied.
    pub fn apply_committed(&self, relationship: Relationship) -> bool {
        let mut index = self.index.write();
        if let Some(entry) = index.entries.get_mut(&relationship.id) {
            if relationship.version < entry.relationship.version {
                return false;
            }
            entry.relationship = relationship;
            return true;
        }
        Self::insert_locked(&mut index, relationship);
        true
    }

    /// Drop a record after the repository confirmed its deletion
    pub fn remove(&self, id: RelationshipId) -> Option<Relationship> {
        self.index
            .write()
            .entries
            .remove(&id)
            .map(|entry| entry.relationship)
    }

    fn insert_locked(index: &mut Index, relationship: Relationship) {
        let seq = index.next_seq;
        index.next_seq += 1;
        index.entries.insert(relationship.id, Entry { seq, relationship });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::{FactionId, RelationshipType};

    fn committed(version: u64) -> Relationship {
        Relationship {
            version,
            ..Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::Ally)
        }
    }

    #[test]
    fn test_load_preserves_order() {
        let records: Vec<_> = (1..=4).map(committed).collect();
        let store = RelationshipStore::from_records(records.clone());

        assert_eq!(store.len(), 4);
        assert_eq!(store.list(), records);
    }

    #[test]
    fn test_replacement_keeps_position() {
        let a = committed(1);
        let b = committed(1);
        let store = RelationshipStore::from_records(vec![a.clone(), b.clone()]);

        let newer = Relationship {
            version: 2,
            relationship_type: RelationshipType::AtWar,
            ..a.clone()
        };
        assert!(store.apply_committed(newer.clone()));

        assert_eq!(store.list(), vec![newer.clone(), b]);
        assert_eq!(store.get(a.id), Some(newer));
    }

    #[test]
    fn test_older_commit_is_ignored() {
        let rel = committed(3);
        let store = RelationshipStore::from_records(vec![rel.clone()]);

        let stale = Relationship {
            version: 2,
            relationship_type: RelationshipType::Vassal,
            ..rel.clone()
        };
        assert!(!store.apply_committed(stale));
        assert_eq!(store.get(rel.id), Some(rel));
    }

    #[test]
    fn test_remove() {
        let rel = committed(1);
        let store = RelationshipStore::from_records(vec![rel.clone()]);

        assert_eq!(store.remove(rel.id), Some(rel.clone()));
        assert!(store.get(rel.id).is_none());
        assert!(store.is_empty());
        assert!(store.remove(rel.id).is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let rel = committed(1);
        let store = RelationshipStore::from_records(vec![rel.clone()]);

        let mut snapshot = store.list();
        snapshot[0].relationship_type = RelationshipType::AtWar;
        assert_eq!(store.get(rel.id).unwrap().relationship_type, RelationshipType::Ally);
    }
}
