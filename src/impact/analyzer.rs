//! Change impact analysis over category relations.
//!
//! Answers "what has to be retested if this clientlib changes": the
//! categories requiring it directly, and those reached by cascading further
//! through the reverse relation graph.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::graph::{Neighbor, RelationGraph};
use crate::index::CategoryIndex;
use crate::inventory::{Clientlib, Inventory, RelationKind};

/// A category reached by the analysis, with the clientlibs publishing it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryImpact<'a> {
    pub category: &'a str,
    /// Kind of the edge through which the category was first reached
    #[serde(rename = "type")]
    pub kind: RelationKind,
    /// Clientlibs publishing the category, in inventory order
    pub clientlibs: Vec<&'a Clientlib>,
}

impl CategoryImpact<'_> {
    /// Paths of the publishing clientlibs.
    pub fn paths(&self) -> Vec<&str> {
        self.clientlibs.iter().map(|lib| lib.path.as_str()).collect()
    }

    /// Combined size of the publishing clientlibs in kilobytes.
    pub fn total_kb(&self) -> f64 {
        self.clientlibs.iter().map(|lib| lib.total_kb).sum()
    }
}

/// Result of an impact computation.
///
/// A category appears at most once across `direct` and `indirect`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Impact<'a> {
    /// Categories requiring one of the start categories, in discovery order
    pub direct: Vec<CategoryImpact<'a>>,
    /// Categories reached by cascading from the direct set, in BFS order
    pub indirect: Vec<CategoryImpact<'a>>,
}

impl<'a> Impact<'a> {
    /// All impacted categories, direct first.
    pub fn all(&self) -> impl Iterator<Item = &CategoryImpact<'a>> {
        self.direct.iter().chain(self.indirect.iter())
    }

    /// Total number of impacted categories.
    pub fn total(&self) -> usize {
        self.direct.len() + self.indirect.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.indirect.is_empty()
    }

    /// Returns true if any direct dependent inlines the changed code.
    pub fn has_embeds(&self) -> bool {
        self.direct.iter().any(|d| d.kind == RelationKind::Embeds)
    }

    /// Distinct clientlibs to retest, in the order they are first reached.
    pub fn clientlibs(&self) -> Vec<&'a Clientlib> {
        let mut seen = HashSet::new();
        self.all()
            .flat_map(|impact| impact.clientlibs.iter().copied())
            .filter(|&lib| seen.insert(lib.path.as_str()))
            .collect()
    }
}

/// Computes direct and cascading impact over one inventory.
///
/// The analyzer only borrows the inventory and its derived structures, so
/// any number of analyzers can run against the same data.
///
/// # Example
///
/// ```rust
/// use clientscope::graph::RelationGraph;
/// use clientscope::impact::ImpactAnalyzer;
/// use clientscope::index::CategoryIndex;
/// use clientscope::inventory::{Inventory, Relation};
///
/// let inventory = Inventory {
///     relations: vec![
///         Relation::depends("a", "b"),
///         Relation::depends("b", "c"),
///         Relation::embeds("a", "c"),
///     ],
///     ..Inventory::default()
/// };
/// let index = CategoryIndex::build(&inventory);
/// let graph = RelationGraph::build(&inventory.relations);
/// let analyzer = ImpactAnalyzer::new(&inventory, &index, &graph);
///
/// let impact = analyzer.compute_impact(&["c"]);
/// let direct: Vec<_> = impact.direct.iter().map(|d| d.category).collect();
/// assert_eq!(direct, vec!["b", "a"]);
/// assert!(impact.indirect.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImpactAnalyzer<'a> {
    inventory: &'a Inventory,
    index: &'a CategoryIndex,
    graph: &'a RelationGraph,
}

impl<'a> ImpactAnalyzer<'a> {
    pub fn new(inventory: &'a Inventory, index: &'a CategoryIndex, graph: &'a RelationGraph) -> Self {
        Self {
            inventory,
            index,
            graph,
        }
    }

    fn resolve(&self, neighbor: &'a Neighbor) -> CategoryImpact<'a> {
        CategoryImpact {
            category: neighbor.category.as_str(),
            kind: neighbor.kind,
            clientlibs: self.index.clientlibs_for(self.inventory, &neighbor.category),
        }
    }

    /// Computes the categories impacted by a change to `start`.
    ///
    /// All start categories are seeded together: a category requiring any
    /// of them is one direct impact. The cascade then walks the reverse
    /// graph breadth-first from the direct set. Every category is recorded
    /// at most once, with the edge kind of its first discovery, which also
    /// bounds the walk on cyclic relations.
    pub fn compute_impact<S: AsRef<str>>(&self, start: &[S]) -> Impact<'a> {
        let graph: &'a RelationGraph = self.graph;
        let mut visited: HashSet<&'a str> = HashSet::new();
        let mut direct = Vec::new();

        for category in start {
            for neighbor in graph.reverse(category.as_ref()) {
                if visited.insert(neighbor.category.as_str()) {
                    direct.push(self.resolve(neighbor));
                }
            }
        }

        let mut queue: VecDeque<&'a str> = direct.iter().map(|d| d.category).collect();
        let mut indirect = Vec::new();

        while let Some(current) = queue.pop_front() {
            for neighbor in graph.reverse(current) {
                if visited.insert(neighbor.category.as_str()) {
                    indirect.push(self.resolve(neighbor));
                    queue.push_back(neighbor.category.as_str());
                }
            }
        }

        debug!(
            start = start.len(),
            direct = direct.len(),
            indirect = indirect.len(),
            "computed impact"
        );

        Impact { direct, indirect }
    }

    /// Lists what the start categories themselves require.
    ///
    /// Single hop only: the result shows direct requirements, deduplicated
    /// by category with the first edge kind seen.
    pub fn compute_dependencies<S: AsRef<str>>(&self, start: &[S]) -> Vec<CategoryImpact<'a>> {
        let graph: &'a RelationGraph = self.graph;
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut dependencies = Vec::new();

        for category in start {
            for neighbor in graph.forward(category.as_ref()) {
                if seen.insert(neighbor.category.as_str()) {
                    dependencies.push(self.resolve(neighbor));
                }
            }
        }

        dependencies
    }

    /// Impact of changing a clientlib, seeded from all of its categories.
    pub fn impact_of(&self, clientlib: &Clientlib) -> Impact<'a> {
        self.compute_impact(&clientlib.categories)
    }

    /// Direct requirements of a clientlib's categories.
    pub fn dependencies_of(&self, clientlib: &Clientlib) -> Vec<CategoryImpact<'a>> {
        self.compute_dependencies(&clientlib.categories)
    }
}
