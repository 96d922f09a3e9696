//! Concord Domain Layer
//!
//! This crate contains the domain model for faction diplomacy. It has no
//! dependencies besides `uuid` and defines the value objects and trait
//! interfaces that the storage and service crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Faction**: An opaque, persistent group identified by a [`FactionId`]
//! - **Relationship**: A *directed* edge from one faction to another, tagged
//!   with a [`RelationshipType`]. Two edges together make a bidirectional fact
//!   (alliance, vassalage); a single edge is only a claim.
//! - **Trees**: Vassal trees and liege chains derived from verified edges
//! - **Events**: Pre-commit notifications that hooks may cancel
//!
//! ## Architecture
//!
//! - Pure domain types only
//! - Infrastructure (SQLite, in-memory) lives in `concord-store`
//! - Behavior (reciprocity, mutation pipeline) lives in `concord-relations`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event;
pub mod faction;
mod id;
pub mod relationship;
pub mod traits;
pub mod tree;

// Re-exports for convenience
pub use error::RepositoryError;
pub use event::{HookDecision, RelationshipEvent};
pub use faction::FactionId;
pub use relationship::{Relationship, RelationshipId, RelationshipType};
pub use traits::{RelationshipHook, RelationshipRepository};
pub use tree::{LiegeNode, VassalNode};
