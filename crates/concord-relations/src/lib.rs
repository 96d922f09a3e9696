//! Concord Relations
//!
//! The faction relationship service: an in-memory, concurrently readable
//! index of directed diplomatic edges, backed by a repository collaborator.
//!
//! # Overview
//!
//! - **Relationship Store**: authoritative index, loaded once at startup
//! - **Reciprocity Engine**: alliance and vassalage count only when both
//!   sides agree; war counts when either side declares it
//! - **Mutation Pipeline**: hook notification, repository commit, then index
//!   update, in that order
//! - **Tree Derivation**: vassal trees and liege chains with cycle cutoffs
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use concord_domain::{FactionId, HookDecision, Relationship, RelationshipEvent, RelationshipType};
//! use concord_relations::{FailureKind, RelationsConfig, RelationshipService};
//! use concord_store::InMemoryRelationshipRepository;
//!
//! let service = RelationshipService::new(
//!     InMemoryRelationshipRepository::new(),
//!     RelationsConfig::default(),
//! ).unwrap();
//!
//! // Refuse every new war declaration
//! service.register_hook(Arc::new(|event: &RelationshipEvent| {
//!     match event.relationship() {
//!         Some(rel) if rel.relationship_type == RelationshipType::AtWar => {
//!             HookDecision::Cancel("ceasefire".to_string())
//!         }
//!         _ => HookDecision::Continue,
//!     }
//! }));
//!
//! let war = Relationship::new(FactionId::new(), FactionId::new(), RelationshipType::AtWar);
//! let failure = service.save(war).unwrap_err();
//! assert_eq!(failure.kind(), FailureKind::Cancelled);
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [relations]
//! max_tree_depth = 64
//! max_tree_nodes = 4096
//! warn_on_multiple_lieges = true
//! log_filter = "info"
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod hooks;
pub mod logging;
mod pipeline;
pub mod reciprocity;
mod service;
mod store;
pub mod tree;

pub use config::{ConfigError, RelationsConfig};
pub use error::{FailureKind, FailureSource, HookCancelled, ServiceError, ServiceFailure};
pub use hooks::HookRegistry;
pub use service::RelationshipService;
pub use store::RelationshipStore;
