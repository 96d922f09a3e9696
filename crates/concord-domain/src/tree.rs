//! Derived hierarchy structures
//!
//! Neither structure is persisted; both are rebuilt on demand from verified
//! vassal edges.

use crate::FactionId;

/// A faction and the trees of its verified vassals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VassalNode {
    /// Faction at this node
    pub faction_id: FactionId,

    /// Subtrees of verified vassals, in query order
    pub vassals: Vec<VassalNode>,
}

impl VassalNode {
    /// Create a leaf node
    pub fn leaf(faction_id: FactionId) -> Self {
        Self {
            faction_id,
            vassals: Vec::new(),
        }
    }

    /// All factions in the tree, pre-order
    pub fn faction_ids(&self) -> Vec<FactionId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.faction_id);
            stack.extend(node.vassals.iter().rev());
        }
        ids
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        1 + self.vassals.iter().map(VassalNode::len).sum::<usize>()
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `faction_id` appears anywhere in the tree
    pub fn contains(&self, faction_id: FactionId) -> bool {
        self.faction_id == faction_id || self.vassals.iter().any(|v| v.contains(faction_id))
    }
}

/// A faction and, if it has one, its verified liege's chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiegeNode {
    /// Faction at this node
    pub faction_id: FactionId,

    /// Chain of the next liege up, if any
    pub liege: Option<Box<LiegeNode>>,
}

impl LiegeNode {
    /// Create a chain terminator (a faction with no liege)
    pub fn root(faction_id: FactionId) -> Self {
        Self {
            faction_id,
            liege: None,
        }
    }

    /// Factions from this node up to the outermost liege
    pub fn faction_ids(&self) -> Vec<FactionId> {
        let mut ids = vec![self.faction_id];
        let mut current = self.liege.as_deref();
        while let Some(node) = current {
            ids.push(node.faction_id);
            current = node.liege.as_deref();
        }
        ids
    }

    /// Number of lieges above this node
    pub fn depth(&self) -> usize {
        self.faction_ids().len() - 1
    }

    /// The outermost liege (this faction if it has none)
    pub fn top(&self) -> FactionId {
        let mut node = self;
        while let Some(next) = node.liege.as_deref() {
            node = next;
        }
        node.faction_id
    }
}
