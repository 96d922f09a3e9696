//! Concord Storage Layer
//!
//! Implements the `RelationshipRepository` trait from `concord-domain`.
//!
//! # Implementations
//!
//! - [`SqliteRelationshipRepository`]: durable storage in SQLite, with
//!   optimistic locking on a `version` column
//! - [`InMemoryRelationshipRepository`]: the same locking rules over a
//!   `Vec`, for tests and embedding
//!
//! # Examples
//!
//! ```no_run
//! use concord_domain::{FactionId, Relationship, RelationshipRepository, RelationshipType};
//! use concord_store::SqliteRelationshipRepository;
//!
//! let repo = SqliteRelationshipRepository::new("concord.db").unwrap();
//! let rel = Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::Ally);
//! let committed = repo.upsert(rel).unwrap();
//! assert_eq!(committed.version, 1);
//! ```

#![warn(missing_docs)]

mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::InMemoryRelationshipRepository;
pub use sqlite::SqliteRelationshipRepository;

use concord_domain::{Relationship, RepositoryError};

/// Apply the optimistic locking rule shared by every repository
///
/// `stored` is the version currently persisted for the record's id, if any.
/// Returns the record as it should be committed.
pub(crate) fn next_revision(
    relationship: Relationship,
    stored: Option<u64>,
) -> Result<Relationship, RepositoryError> {
    if let Some(actual) = stored {
        if actual != relationship.version {
            return Err(RepositoryError::Conflict {
                id: relationship.id,
                expected: relationship.version,
                actual,
            });
        }
    }
    let version = relationship.version.checked_add(1).ok_or_else(|| {
        RepositoryError::storage(format!(
            "Version counter exhausted for relationship {}",
            relationship.id
        ))
    })?;
    Ok(Relationship {
        version,
        ..relationship
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::{FactionId, RelationshipType};

    fn submitted(version: u64) -> Relationship {
        Relationship {
            version,
            ..Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::Ally)
        }
    }

    #[test]
    fn test_next_revision_increments() {
        assert_eq!(next_revision(submitted(0), None).unwrap().version, 1);
        assert_eq!(next_revision(submitted(4), Some(4)).unwrap().version, 5);
    }

    #[test]
    fn test_next_revision_rejects_mismatch() {
        let err = next_revision(submitted(1), Some(2)).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_exhausted_version_is_an_error() {
        let err = next_revision(submitted(u64::MAX), None).unwrap_err();
        assert!(matches!(err, RepositoryError::Storage { .. }));
        assert!(err.to_string().contains("Version counter exhausted"));
    }
}
