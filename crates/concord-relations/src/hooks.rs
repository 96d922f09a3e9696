//! Pre-commit hook registry

use concord_domain::{HookDecision, RelationshipEvent, RelationshipHook};
use parking_lot::RwLock;
use std::sync::Arc;

/// Ordered set of hooks consulted before each mutation
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn RelationshipHook>>>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; hooks run in registration order
    pub fn register(&self, hook: Arc<dyn RelationshipHook>) {
        self.hooks.write().push(hook);
    }

    /// Number of registered hooks
    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    /// Whether no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    /// Run every hook until one cancels
    ///
    /// The hook list is copied out before any hook runs, so hooks may register
    /// further hooks or query the service without deadlocking.
    pub fn dispatch(&self, event: &RelationshipEvent) -> HookDecision {
        let hooks: Vec<Arc<dyn RelationshipHook>> = self.hooks.read().clone();
        for hook in hooks {
            let decision = hook.before_commit(event);
            if decision.is_cancelled() {
                return decision;
            }
        }
        HookDecision::Continue
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.len())
            .finish()
    }
}
