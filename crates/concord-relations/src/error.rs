//! Error types for relationship service operations

use concord_domain::RepositoryError;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed originating cause carried by a [`ServiceFailure`]
pub type FailureSource = Box<dyn StdError + Send + Sync + 'static>;

/// Closed set of failure kinds returned by `save` and `delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Optimistic locking version mismatch reported by the repository
    Conflict,

    /// A pre-commit hook vetoed the mutation
    Cancelled,

    /// Any other failure (storage I/O, unexpected repository errors)
    General,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Conflict => "CONFLICT",
            FailureKind::Cancelled => "CANCELLED",
            FailureKind::General => "GENERAL",
        })
    }
}

/// Failure returned from a mutation
///
/// The message is human-readable; `source()` yields the originating cause.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ServiceFailure {
    kind: FailureKind,
    message: String,
    #[source]
    source: Option<FailureSource>,
}

impl ServiceFailure {
    fn new(kind: FailureKind, cause: impl Into<FailureSource>) -> Self {
        let source = cause.into();
        Self {
            kind,
            message: format!("Service error: {}", source),
            source: Some(source),
        }
    }

    /// Version mismatch or concurrent modification
    pub fn conflict(cause: impl Into<FailureSource>) -> Self {
        Self::new(FailureKind::Conflict, cause)
    }

    /// Mutation vetoed by a hook
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::new(
            FailureKind::Cancelled,
            HookCancelled {
                reason: reason.into(),
            },
        )
    }

    /// Any other failure
    pub fn general(cause: impl Into<FailureSource>) -> Self {
        Self::new(FailureKind::General, cause)
    }

    /// Kind of failure, for callers to branch on
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is an optimistic locking conflict
    pub fn is_conflict(&self) -> bool {
        self.kind == FailureKind::Conflict
    }

    /// Whether a hook vetoed the mutation
    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

impl From<RepositoryError> for ServiceFailure {
    fn from(err: RepositoryError) -> Self {
        if err.is_conflict() {
            ServiceFailure::conflict(err)
        } else {
            ServiceFailure::general(err)
        }
    }
}

/// Cause attached to a cancelled mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Event cancelled: {reason}")]
pub struct HookCancelled {
    /// Reason given by the vetoing hook
    pub reason: String,
}

/// Fatal errors raised while constructing the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The startup load from the repository failed
    #[error("Failed to load faction relationships: {0}")]
    Load(#[source] RepositoryError),
}
