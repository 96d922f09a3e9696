//! Vassal tree and liege chain derivation
//!
//! The edge set carries no acyclicity guarantee, so both traversals track the
//! factions already on the current path and stop at a depth bound. A faction
//! reachable through several lieges is expanded under each of them, so vassal
//! trees also carry a node budget: a layered diamond would otherwise grow as
//! `2^depth`.

use crate::reciprocity::EdgeView;
use crate::RelationsConfig;
use concord_domain::{FactionId, LiegeNode, VassalNode};
use std::collections::HashSet;
use tracing::warn;

/// Bounds and audit switches applied to a derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Deepest level to descend to
    pub max_depth: usize,
    /// Most nodes a vassal tree may contain
    pub max_nodes: usize,
    /// Log factions recording more than one liege edge
    pub warn_on_multiple_lieges: bool,
}

impl From<&RelationsConfig> for TreeOptions {
    fn from(config: &RelationsConfig) -> Self {
        Self {
            max_depth: config.max_tree_depth,
            max_nodes: config.max_tree_nodes,
            warn_on_multiple_lieges: config.warn_on_multiple_lieges,
        }
    }
}

/// Build the vassal tree rooted at `root`
///
/// A vassal already on the path from the root is emitted as a leaf and not
/// expanded. Nodes at `max_depth` are emitted without children. Once
/// `max_nodes` nodes exist no further vassals are attached; the root is
/// always emitted.
pub fn vassal_tree(view: &EdgeView<'_>, root: FactionId, options: TreeOptions) -> VassalNode {
    let mut walk = VassalWalk {
        view,
        options,
        path: HashSet::new(),
        emitted: 0,
        budget_warned: false,
    };
    walk.node(root, 0)
}

struct VassalWalk<'v, 'a> {
    view: &'v EdgeView<'a>,
    options: TreeOptions,
    path: HashSet<FactionId>,
    emitted: usize,
    budget_warned: bool,
}

impl VassalWalk<'_, '_> {
    fn node(&mut self, faction_id: FactionId, depth: usize) -> VassalNode {
        self.emitted += 1;

        let vassals = self.view.vassals_of(faction_id);
        if vassals.is_empty() {
            return VassalNode::leaf(faction_id);
        }
        if depth >= self.options.max_depth {
            warn!(
                faction = %faction_id,
                max_depth = self.options.max_depth,
                "Vassal tree depth limit reached, truncating"
            );
            return VassalNode::leaf(faction_id);
        }

        self.path.insert(faction_id);
        let mut children = Vec::with_capacity(vassals.len());
        for vassal in vassals {
            if self.emitted >= self.options.max_nodes {
                self.warn_budget(faction_id);
                break;
            }
            if self.path.contains(&vassal) {
                warn!(
                    faction = %faction_id,
                    vassal = %vassal,
                    "Cycle in vassal relationships, not expanding"
                );
                self.emitted += 1;
                children.push(VassalNode::leaf(vassal));
            } else {
                children.push(self.node(vassal, depth + 1));
            }
        }
        self.path.remove(&faction_id);

        VassalNode {
            faction_id,
            vassals: children,
        }
    }

    fn warn_budget(&mut self, faction_id: FactionId) {
        if !self.budget_warned {
            self.budget_warned = true;
            warn!(
                faction = %faction_id,
                max_nodes = self.options.max_nodes,
                "Vassal tree node budget exhausted, truncating"
            );
        }
    }
}

/// Build the liege chain starting at `start`
///
/// Stops at the first faction without a verified liege, at a faction already
/// in the chain, or after `max_depth` lieges. Each step applies the same
/// first-edge rule and multiple-liege audit as a single liege lookup.
pub fn liege_chain(view: &EdgeView<'_>, start: FactionId, options: TreeOptions) -> LiegeNode {
    let mut chain = vec![start];
    let mut seen: HashSet<FactionId> = HashSet::from([start]);

    let mut current = start;
    while let Some(liege) = view.audited_liege_of(current, options.warn_on_multiple_lieges) {
        if seen.contains(&liege) {
            warn!(
                faction = %current,
                liege = %liege,
                "Cycle in liege relationships, stopping chain"
            );
            break;
        }
        if chain.len() > options.max_depth {
            warn!(
                faction = %start,
                max_depth = options.max_depth,
                "Liege chain depth limit reached, truncating"
            );
            break;
        }
        seen.insert(liege);
        chain.push(liege);
        current = liege;
    }

    // Fold from the outermost liege back down to `start`
    let mut node: Option<LiegeNode> = None;
    for faction_id in chain.into_iter().rev() {
        node = Some(LiegeNode {
            faction_id,
            liege: node.map(Box::new),
        });
    }
    node.unwrap_or_else(|| LiegeNode::root(start))
}
