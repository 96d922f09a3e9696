//! Relationship service: store ownership and the read surface

use crate::hooks::HookRegistry;
use crate::pipeline::CommitLocks;
use crate::reciprocity::EdgeView;
use crate::store::RelationshipStore;
use crate::tree::{self, TreeOptions};
use crate::{RelationsConfig, ServiceError};
use concord_domain::{
    FactionId, LiegeNode, Relationship, RelationshipHook, RelationshipId, RelationshipRepository,
    RelationshipType, VassalNode,
};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Instant;
use tracing::info;

/// Relationship service over a repository collaborator
///
/// All operations take `&self`; share the service between threads with an
/// `Arc`. Reads work on a snapshot of the in-memory index and never fail.
/// Writes go through the mutation pipeline (`save`, `delete`).
///
/// # Examples
///
/// ```
/// use concord_domain::{FactionId, Relationship, RelationshipType};
/// use concord_relations::{RelationsConfig, RelationshipService};
/// use concord_store::InMemoryRelationshipRepository;
///
/// let service = RelationshipService::new(
///     InMemoryRelationshipRepository::new(),
///     RelationsConfig::default(),
/// ).unwrap();
///
/// let (overlord, subject) = (FactionId::new(), FactionId::new());
/// service.save(Relationship::new(overlord, subject, RelationshipType::Vassal)).unwrap();
/// assert!(service.get_vassals(overlord).is_empty());
///
/// service.save(Relationship::new(subject, overlord, RelationshipType::Liege)).unwrap();
/// assert_eq!(service.get_vassals(overlord), vec![subject]);
/// assert_eq!(service.get_liege(subject), Some(overlord));
/// ```
pub struct RelationshipService<R: RelationshipRepository> {
    pub(crate) repository: R,
    pub(crate) store: RelationshipStore,
    pub(crate) hooks: HookRegistry,
    pub(crate) config: RelationsConfig,
    pub(crate) commit_locks: CommitLocks,
    primary_thread: ThreadId,
}

impl<R: RelationshipRepository> RelationshipService<R> {
    /// Load every relationship from the repository and build the service
    ///
    /// A failed load is fatal: no partially loaded service is returned. The
    /// calling thread becomes the primary thread for `is_async` reporting.
    pub fn new(repository: R, config: RelationsConfig) -> Result<Self, ServiceError> {
        info!("Loading faction relationships...");
        let start = Instant::now();

        let records = repository.list_all().map_err(ServiceError::Load)?;
        let store = RelationshipStore::from_records(records);

        info!(
            "{} faction relationships loaded ({}ms)",
            store.len(),
            start.elapsed().as_millis()
        );

        Ok(Self {
            repository,
            store,
            hooks: HookRegistry::new(),
            config,
            commit_locks: CommitLocks::new(),
            primary_thread: thread::current().id(),
        })
    }

    /// Designate a different primary thread (e.g. the host's main loop)
    pub fn with_primary_thread(mut self, thread_id: ThreadId) -> Self {
        self.primary_thread = thread_id;
        self
    }

    /// Register a pre-commit hook
    pub fn register_hook(&self, hook: Arc<dyn RelationshipHook>) {
        self.hooks.register(hook);
    }

    /// Number of registered hooks
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// The active configuration
    pub fn config(&self) -> &RelationsConfig {
        &self.config
    }

    /// The repository collaborator
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Whether the current thread is not the primary thread
    pub(crate) fn is_async_caller(&self) -> bool {
        thread::current().id() != self.primary_thread
    }

    // ---- Relationship Store ----

    /// Look up a relationship by identifier
    pub fn get_relationship(&self, id: RelationshipId) -> Option<Relationship> {
        self.store.get(id)
    }

    /// Snapshot of every relationship, first recorded first
    pub fn list_relationships(&self) -> Vec<Relationship> {
        self.store.list()
    }

    // ---- Reciprocity Engine ----

    fn with_view<T>(&self, f: impl FnOnce(&EdgeView<'_>) -> T) -> T {
        let snapshot = self.store.list();
        f(&EdgeView::new(&snapshot))
    }

    /// Raw edges from `faction_id` to `target_id`
    pub fn get_relationships_between(
        &self,
        faction_id: FactionId,
        target_id: FactionId,
    ) -> Vec<Relationship> {
        self.with_view(|view| view.between(faction_id, target_id).cloned().collect())
    }

    /// Raw outgoing edges of `faction_id`
    pub fn get_relationships(&self, faction_id: FactionId) -> Vec<Relationship> {
        self.with_view(|view| view.outgoing(faction_id).cloned().collect())
    }

    /// Raw outgoing edges of `faction_id` with the given type
    pub fn get_relationships_of_type(
        &self,
        faction_id: FactionId,
        relationship_type: RelationshipType,
    ) -> Vec<Relationship> {
        self.with_view(|view| {
            view.outgoing_of_type(faction_id, relationship_type)
                .cloned()
                .collect()
        })
    }

    /// Verified liege of `faction_id`
    ///
    /// Only the first recorded `LIEGE` edge counts; extra liege edges are
    /// logged as a data-quality problem.
    pub fn get_liege(&self, faction_id: FactionId) -> Option<FactionId> {
        self.with_view(|view| view.audited_liege_of(faction_id, self.config.warn_on_multiple_lieges))
    }

    /// Verified vassals of `faction_id`
    pub fn get_vassals(&self, faction_id: FactionId) -> Vec<FactionId> {
        self.with_view(|view| view.vassals_of(faction_id))
    }

    /// Factions allied with `faction_id` in both directions
    pub fn get_allies(&self, faction_id: FactionId) -> Vec<FactionId> {
        self.with_view(|view| view.allies_of(faction_id))
    }

    /// Factions at war with `faction_id`
    ///
    /// Unlike alliance and vassalage, war needs no reciprocity: one
    /// declaration in either direction is enough.
    pub fn get_factions_at_war_with(&self, faction_id: FactionId) -> Vec<FactionId> {
        self.with_view(|view| view.at_war_with(faction_id))
    }

    /// Whether either faction has declared war on the other
    pub fn is_at_war(&self, a: FactionId, b: FactionId) -> bool {
        self.with_view(|view| view.is_at_war(a, b))
    }

    /// Whether the two factions are allied in both directions
    pub fn are_allied(&self, a: FactionId, b: FactionId) -> bool {
        self.with_view(|view| view.are_allied(a, b))
    }

    // ---- Tree Derivation ----

    /// Vassal tree rooted at `faction_id`
    pub fn get_vassal_tree(&self, faction_id: FactionId) -> VassalNode {
        self.with_view(|view| tree::vassal_tree(view, faction_id, self.tree_options()))
    }

    /// Liege chain from `faction_id` up to its outermost liege
    pub fn get_liege_chain(&self, faction_id: FactionId) -> LiegeNode {
        self.with_view(|view| tree::liege_chain(view, faction_id, self.tree_options()))
    }

    fn tree_options(&self) -> TreeOptions {
        TreeOptions::from(&self.config)
    }
}

impl<R: RelationshipRepository> std::fmt::Debug for RelationshipService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipService")
            .field("relationships", &self.store.len())
            .field("hooks", &self.hooks.len())
            .field("config", &self.config)
            .finish()
    }
}
