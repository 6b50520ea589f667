//! Category relation graph.
//!
//! Adjacency structures over categories built from the inventory relation
//! list, with forward ("what does this require") and reverse ("who requires
//! this") neighbor queries. A petgraph mirror of the same edges backs cycle
//! detection.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::inventory::{Category, Relation, RelationKind};

/// One end of a relation, seen from the other end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Neighbor {
    /// The category on the other side of the edge
    pub category: Category,
    /// Kind of the edge
    pub kind: RelationKind,
}

impl Neighbor {
    pub fn new(category: impl Into<Category>, kind: RelationKind) -> Self {
        Self {
            category: category.into(),
            kind,
        }
    }
}

/// A directed graph of category relations.
///
/// Edges point from the requiring category to the required one. Relations
/// are kept exactly as given: parallel edges (including two edges of
/// different kinds between the same pair) and self-loops are preserved, and
/// neighbor lists keep the order in which the relations were first seen.
///
/// # Example
///
/// ```rust
/// use clientscope::graph::RelationGraph;
/// use clientscope::inventory::{Relation, RelationKind};
///
/// let graph = RelationGraph::build(&[
///     Relation::depends("site.page", "site.base"),
///     Relation::embeds("site.page", "site.icons"),
///     Relation::depends("site.blog", "site.base"),
/// ]);
///
/// assert_eq!(graph.forward("site.page").len(), 2);
/// let dependents: Vec<_> = graph.reverse("site.base").iter().map(|n| n.category.as_str()).collect();
/// assert_eq!(dependents, vec!["site.page", "site.blog"]);
/// assert_eq!(graph.forward_by_kind("site.page", RelationKind::Embeds).count(), 1);
/// assert!(graph.reverse("unknown").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    /// petgraph mirror of the relations, used for cycle analysis
    graph: DiGraph<Category, RelationKind>,
    /// Maps categories to their node indices for O(1) lookup
    node_indices: HashMap<Category, NodeIndex>,
    /// Category -> categories it requires
    forward: HashMap<Category, Vec<Neighbor>>,
    /// Category -> categories requiring it
    reverse: HashMap<Category, Vec<Neighbor>>,
}

impl RelationGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
            forward: HashMap::with_capacity(nodes),
            reverse: HashMap::with_capacity(nodes),
        }
    }

    /// Builds the graph from a relation list.
    ///
    /// No validation is performed; malformed relations are accepted verbatim
    /// and consumers are expected to traverse with bounded algorithms.
    pub fn build(relations: &[Relation]) -> Self {
        let mut graph = Self::with_capacity(relations.len(), relations.len());
        for relation in relations {
            graph.add_relation(relation);
        }
        debug!(
            categories = graph.node_count(),
            relations = graph.edge_count(),
            "built relation graph"
        );
        graph
    }

    fn add_relation(&mut self, relation: &Relation) {
        let from = self.ensure_node(&relation.from);
        let to = self.ensure_node(&relation.to);
        self.graph.add_edge(from, to, relation.kind);

        self.forward
            .entry(relation.from.clone())
            .or_default()
            .push(Neighbor::new(relation.to.clone(), relation.kind));
        self.reverse
            .entry(relation.to.clone())
            .or_default()
            .push(Neighbor::new(relation.from.clone(), relation.kind));
    }

    fn ensure_node(&mut self, category: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(category) {
            return idx;
        }
        let idx = self.graph.add_node(category.to_string());
        self.node_indices.insert(category.to_string(), idx);
        idx
    }

    /// Categories `category` requires, in relation order.
    pub fn forward(&self, category: &str) -> &[Neighbor] {
        self.forward
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories requiring `category`, in relation order.
    pub fn reverse(&self, category: &str) -> &[Neighbor] {
        self.reverse
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Forward neighbors reached through edges of the given kind.
    pub fn forward_by_kind<'a>(
        &'a self,
        category: &str,
        kind: RelationKind,
    ) -> impl Iterator<Item = &'a Neighbor> + 'a {
        self.forward(category).iter().filter(move |n| n.kind == kind)
    }

    /// Reverse neighbors reached through edges of the given kind.
    pub fn reverse_by_kind<'a>(
        &'a self,
        category: &str,
        kind: RelationKind,
    ) -> impl Iterator<Item = &'a Neighbor> + 'a {
        self.reverse(category).iter().filter(move |n| n.kind == kind)
    }

    /// Every category appearing in a relation, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.node_indices.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Checks if a category appears in any relation.
    pub fn contains(&self, category: &str) -> bool {
        self.node_indices.contains_key(category)
    }

    /// Returns the number of distinct categories.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of relations, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if the relations contain at least one cycle.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Detects all cycles.
    ///
    /// Each strongly connected component with more than one category, or a
    /// single category with a self-loop, is a cycle. Categories within a
    /// cycle are sorted, and cycles are sorted by their first category, so
    /// the result is deterministic.
    pub fn detect_cycles(&self) -> Vec<Vec<Category>> {
        let mut cycles = Vec::new();

        for scc in tarjan_scc(&self.graph) {
            let is_cycle = scc.len() > 1 || (scc.len() == 1 && self.graph.contains_edge(scc[0], scc[0]));
            if !is_cycle {
                continue;
            }
            let mut cycle: Vec<Category> = scc
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx))
                .cloned()
                .collect();
            cycle.sort_unstable();
            cycles.push(cycle);
        }

        cycles.sort_unstable();
        cycles
    }

    /// Returns the categories that take part in at least one cycle.
    pub fn categories_in_cycles(&self) -> HashSet<Category> {
        self.detect_cycles().into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(neighbors: &[Neighbor]) -> Vec<&str> {
        neighbors.iter().map(|n| n.category.as_str()).collect()
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = RelationGraph::build(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.has_cycles());
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_neighbor_order_is_first_seen() {
        let graph = RelationGraph::build(&[
            Relation::depends("c", "z"),
            Relation::depends("a", "z"),
            Relation::depends("b", "z"),
            Relation::depends("a", "y"),
        ]);

        assert_eq!(names(graph.reverse("z")), vec!["c", "a", "b"]);
        assert_eq!(names(graph.forward("a")), vec!["z", "y"]);
        assert_eq!(graph.categories(), vec!["a", "b", "c", "y", "z"]);
    }

    #[test]
    fn test_parallel_edges_are_preserved() {
        let graph = RelationGraph::build(&[
            Relation::depends("a", "b"),
            Relation::embeds("a", "b"),
            Relation::depends("a", "b"),
        ]);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(
            graph.forward("a"),
            &[
                Neighbor::new("b", RelationKind::Depends),
                Neighbor::new("b", RelationKind::Embeds),
                Neighbor::new("b", RelationKind::Depends),
            ]
        );
        assert_eq!(graph.reverse_by_kind("b", RelationKind::Depends).count(), 2);
        assert_eq!(graph.reverse_by_kind("b", RelationKind::Embeds).count(), 1);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let graph = RelationGraph::build(&[Relation::depends("a", "b")]);
        assert!(graph.forward("nope").is_empty());
        assert!(graph.reverse("nope").is_empty());
        assert!(graph.forward("b").is_empty());
        assert!(!graph.contains("nope"));
        assert!(graph.contains("b"));
    }

    #[test]
    fn test_self_loop_is_accepted() {
        let graph = RelationGraph::build(&[Relation::depends("a", "a")]);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(names(graph.forward("a")), vec!["a"]);
        assert_eq!(names(graph.reverse("a")), vec!["a"]);
        assert_eq!(graph.detect_cycles(), vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_detect_cycles() {
        let graph = RelationGraph::build(&[
            Relation::depends("c", "a"),
            Relation::depends("a", "b"),
            Relation::depends("b", "c"),
            Relation::depends("a", "d"),
        ]);

        assert!(graph.has_cycles());
        assert_eq!(graph.detect_cycles(), vec![vec!["a", "b", "c"]]);

        let in_cycles = graph.categories_in_cycles();
        assert!(in_cycles.contains("a"));
        assert!(in_cycles.contains("c"));
        assert!(!in_cycles.contains("d"));
    }

    #[test]
    fn test_acyclic_graph() {
        let graph = RelationGraph::build(&[
            Relation::depends("a", "b"),
            Relation::embeds("a", "c"),
            Relation::depends("b", "c"),
        ]);
        assert!(!graph.has_cycles());
        assert!(graph.categories_in_cycles().is_empty());
    }
}
