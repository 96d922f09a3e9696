//! Repository error type
//!
//! Implemented by hand so the domain crate stays free of derive dependencies.

use crate::RelationshipId;
use std::error::Error;
use std::fmt;

/// Errors reported by a [`RelationshipRepository`](crate::RelationshipRepository)
#[derive(Debug)]
pub enum RepositoryError {
    /// The stored version differs from the submitted one
    Conflict {
        /// Relationship being written
        id: RelationshipId,
        /// Version the caller submitted
        expected: u64,
        /// Version currently stored
        actual: u64,
    },

    /// No record with this identifier
    NotFound(RelationshipId),

    /// Underlying storage failure
    Storage {
        /// Human-readable description
        message: String,
        /// Originating cause, if any
        source: Option<Box<dyn Error + Send + Sync>>,
    },
}

impl RepositoryError {
    /// Storage failure without an underlying cause
    pub fn storage(message: impl Into<String>) -> Self {
        RepositoryError::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Storage failure wrapping an underlying cause
    pub fn storage_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        RepositoryError::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is an optimistic locking conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict { .. })
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Conflict {
                id,
                expected,
                actual,
            } => write!(
                f,
                "Optimistic locking failure for relationship {}: expected version {}, found {}",
                id, expected, actual
            ),
            RepositoryError::NotFound(id) => write!(f, "Relationship not found: {}", id),
            RepositoryError::Storage { message, .. } => write!(f, "Storage error: {}", message),
        }
    }
}

impl Error for RepositoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RepositoryError::Storage {
                source: Some(source),
                ..
            } => Some(&**source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message() {
        let id = RelationshipId::new();
        let err = RepositoryError::Conflict {
            id,
            expected: 2,
            actual: 3,
        };
        assert!(err.is_conflict());
        let msg = err.to_string();
        assert!(msg.contains("expected version 2"));
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn test_storage_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = RepositoryError::storage_with_source("write failed", io);
        assert!(!err.is_conflict());
        let source = err.source().expect("source should be kept");
        assert_eq!(source.to_string(), "disk on fire");
    }
}
