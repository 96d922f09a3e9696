//! Reciprocity rules over raw directed edges
//!
//! A one-sided claim is not binding. Alliance needs `ALLY` in both
//! directions; vassalage needs `VASSAL` one way and `LIEGE` back. War is the
//! exception: a single `AT_WAR` edge in either direction is enough.

use concord_domain::{FactionId, Relationship, RelationshipType};
use tracing::warn;

/// Read-only view over one consistent snapshot of the edge set
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    edges: &'a [Relationship],
}

impl<'a> EdgeView<'a> {
    /// Wrap a snapshot in first-recorded order
    pub fn new(edges: &'a [Relationship]) -> Self {
        Self { edges }
    }

    /// Raw edges from `faction_id` to `target_id`
    pub fn between(
        &self,
        faction_id: FactionId,
        target_id: FactionId,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.edges
            .iter()
            .filter(move |r| r.connects(faction_id, target_id))
    }

    /// Raw outgoing edges of `faction_id`
    pub fn outgoing(&self, faction_id: FactionId) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.edges.iter().filter(move |r| r.faction_id == faction_id)
    }

    /// Raw outgoing edges of `faction_id` with the given type
    pub fn outgoing_of_type(
        &self,
        faction_id: FactionId,
        relationship_type: RelationshipType,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.outgoing(faction_id)
            .filter(move |r| r.relationship_type == relationship_type)
    }

    /// Whether `faction_id` records an edge of `relationship_type` to `target_id`
    pub fn records(
        &self,
        faction_id: FactionId,
        target_id: FactionId,
        relationship_type: RelationshipType,
    ) -> bool {
        self.between(faction_id, target_id)
            .any(|r| r.relationship_type == relationship_type)
    }

    /// Whether `edge` is acknowledged by its target
    fn is_reciprocated(&self, edge: &Relationship) -> bool {
        match edge.relationship_type.reciprocal() {
            Some(expected) => self.records(edge.target_id, edge.faction_id, expected),
            None => true,
        }
    }

    /// Outgoing `LIEGE` edges, first recorded first
    pub fn liege_claims(&self, faction_id: FactionId) -> Vec<FactionId> {
        self.outgoing_of_type(faction_id, RelationshipType::Liege)
            .map(|r| r.target_id)
            .collect()
    }

    /// Verified liege of `faction_id`
    ///
    /// Only the first recorded `LIEGE` edge is consulted.
    pub fn liege_of(&self, faction_id: FactionId) -> Option<FactionId> {
        self.outgoing_of_type(faction_id, RelationshipType::Liege)
            .next()
            .filter(|edge| self.is_reciprocated(edge))
            .map(|edge| edge.target_id)
    }

    /// Verified liege of `faction_id`, logging extra liege edges when asked
    ///
    /// Multiple liege edges are a data-quality problem; the first recorded
    /// edge still decides.
    pub fn audited_liege_of(&self, faction_id: FactionId, warn_on_multiple: bool) -> Option<FactionId> {
        if warn_on_multiple {
            let claims = self.liege_claims(faction_id);
            if claims.len() > 1 {
                warn!(
                    faction = %faction_id,
                    liege_edges = claims.len(),
                    "Faction records multiple liege relationships; only the first is used"
                );
            }
        }
        self.liege_of(faction_id)
    }

    /// Verified vassals of `faction_id`
    pub fn vassals_of(&self, faction_id: FactionId) -> Vec<FactionId> {
        self.confirmed(faction_id, RelationshipType::Vassal)
    }

    /// Factions allied with `faction_id` in both directions
    pub fn allies_of(&self, faction_id: FactionId) -> Vec<FactionId> {
        self.confirmed(faction_id, RelationshipType::Ally)
    }

    /// Factions at war with `faction_id`, declared by either side
    pub fn at_war_with(&self, faction_id: FactionId) -> Vec<FactionId> {
        let mut enemies: Vec<FactionId> = Vec::new();
        for edge in self.edges {
            if edge.relationship_type != RelationshipType::AtWar || !edge.involves(faction_id) {
                continue;
            }
            let other = if edge.faction_id == faction_id {
                edge.target_id
            } else {
                edge.faction_id
            };
            if !enemies.contains(&other) {
                enemies.push(other);
            }
        }
        enemies
    }

    /// Whether either side of the pair has declared war on the other
    pub fn is_at_war(&self, a: FactionId, b: FactionId) -> bool {
        self.records(a, b, RelationshipType::AtWar) || self.records(b, a, RelationshipType::AtWar)
    }

    /// Whether the pair is allied in both directions
    pub fn are_allied(&self, a: FactionId, b: FactionId) -> bool {
        self.records(a, b, RelationshipType::Ally) && self.records(b, a, RelationshipType::Ally)
    }

    fn confirmed(&self, faction_id: FactionId, relationship_type: RelationshipType) -> Vec<FactionId> {
        let mut targets: Vec<FactionId> = Vec::new();
        for edge in self.outgoing_of_type(faction_id, relationship_type) {
            if self.is_reciprocated(edge) && !targets.contains(&edge.target_id) {
                targets.push(edge.target_id);
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn edge(from: FactionId, to: FactionId, ty: RelationshipType) -> Relationship {
        Relationship::new(from, to, ty)
    }

    fn factions<const N: usize>() -> [FactionId; N] {
        std::array::from_fn(|_| FactionId::new())
    }

    #[test]
    fn test_vassalage_requires_both_edges() {
        let [a, b] = factions();
        let both = vec![
            edge(a, b, RelationshipType::Vassal),
            edge(b, a, RelationshipType::Liege),
        ];
        let view = EdgeView::new(&both);
        assert_eq!(view.vassals_of(a), vec![b]);
        assert_eq!(view.liege_of(b), Some(a));

        for one_sided in [&both[..1], &both[1..]] {
            let view = EdgeView::new(one_sided);
            assert!(view.vassals_of(a).is_empty());
            assert_eq!(view.liege_of(b), None);
        }
    }

    #[test]
    fn test_only_first_liege_edge_counts() {
        let [vassal, first, second] = factions();
        // `second` acknowledges the vassal, `first` does not
        let edges = vec![
            edge(vassal, first, RelationshipType::Liege),
            edge(vassal, second, RelationshipType::Liege),
            edge(second, vassal, RelationshipType::Vassal),
        ];
        let view = EdgeView::new(&edges);

        assert_eq!(view.liege_claims(vassal), vec![first, second]);
        assert_eq!(view.liege_of(vassal), None);
        assert_eq!(view.vassals_of(second), vec![vassal]);
    }

    #[test]
    fn test_one_sided_ally_is_not_an_alliance() {
        let [a, b] = factions();
        let mut edges = vec![edge(a, b, RelationshipType::Ally)];
        assert!(EdgeView::new(&edges).allies_of(a).is_empty());
        assert!(EdgeView::new(&edges).allies_of(b).is_empty());
        assert!(!EdgeView::new(&edges).are_allied(a, b));

        edges.push(edge(b, a, RelationshipType::Ally));
        let view = EdgeView::new(&edges);
        assert_eq!(view.allies_of(a), vec![b]);
        assert_eq!(view.allies_of(b), vec![a]);
        assert!(view.are_allied(b, a));
    }

    #[test]
    fn test_war_is_union_of_directions() {
        let [a, b, c] = factions();
        let edges = vec![
            edge(a, b, RelationshipType::AtWar),
            edge(c, a, RelationshipType::AtWar),
        ];
        let view = EdgeView::new(&edges);

        assert_eq!(view.at_war_with(a), vec![b, c]);
        assert_eq!(view.at_war_with(b), vec![a]);
        assert_eq!(view.at_war_with(c), vec![a]);
        assert!(view.is_at_war(b, a));
        assert!(!view.is_at_war(b, c));
    }

    #[test]
    fn test_mutual_war_listed_once() {
        let [a, b] = factions();
        let edges = vec![
            edge(a, b, RelationshipType::AtWar),
            edge(b, a, RelationshipType::AtWar),
        ];
        assert_eq!(EdgeView::new(&edges).at_war_with(a), vec![b]);
    }

    #[test]
    fn test_raw_queries_are_directed() {
        let [a, b] = factions();
        let edges = vec![
            edge(a, b, RelationshipType::Ally),
            edge(a, b, RelationshipType::AtWar),
            edge(b, a, RelationshipType::Vassal),
        ];
        let view = EdgeView::new(&edges);

        assert_eq!(view.between(a, b).count(), 2);
        assert_eq!(view.between(b, a).count(), 1);
        assert_eq!(view.outgoing(a).count(), 2);
        assert_eq!(view.outgoing_of_type(a, RelationshipType::AtWar).count(), 1);
        assert_eq!(view.outgoing_of_type(b, RelationshipType::Ally).count(), 0);
    }

    const TYPES: [RelationshipType; 4] = [
        RelationshipType::Ally,
        RelationshipType::AtWar,
        RelationshipType::Liege,
        RelationshipType::Vassal,
    ];

    fn arbitrary_edges(pool: &[FactionId], raw: &[(usize, usize, usize)]) -> Vec<Relationship> {
        raw.iter()
            .map(|&(from, to, ty)| edge(pool[from], pool[to], TYPES[ty]))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_alliance_is_symmetric(raw in prop::collection::vec((0usize..5, 0usize..5, 0usize..4), 0..30)) {
            let pool: [FactionId; 5] = factions();
            let edges = arbitrary_edges(&pool, &raw);
            let view = EdgeView::new(&edges);

            for &a in &pool {
                for b in view.allies_of(a) {
                    prop_assert!(view.allies_of(b).contains(&a));
                }
            }
        }

        #[test]
        fn prop_war_is_symmetric(raw in prop::collection::vec((0usize..5, 0usize..5, 0usize..4), 0..30)) {
            let pool: [FactionId; 5] = factions();
            let edges = arbitrary_edges(&pool, &raw);
            let view = EdgeView::new(&edges);

            for &a in &pool {
                for b in view.at_war_with(a) {
                    prop_assert!(view.at_war_with(b).contains(&a));
                    prop_assert!(view.is_at_war(a, b));
                }
            }
        }

        #[test]
        fn prop_verified_vassal_has_matching_liege(raw in prop::collection::vec((0usize..5, 0usize..5, 0usize..4), 0..30)) {
            let pool: [FactionId; 5] = factions();
            let edges = arbitrary_edges(&pool, &raw);
            let view = EdgeView::new(&edges);

            for &a in &pool {
                if let Some(liege) = view.liege_of(a) {
                    prop_assert!(view.vassals_of(liege).contains(&a));
                }
            }
        }
    }
}
