//! Graph view construction.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::debug;

use super::layout::{assign_layers, LayoutConfig, Position};
use super::visible::VisibleSet;
use crate::inventory::{Category, Relation, RelationKind};

/// A category node of the graph view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: Category,
    /// Whether the category has at least one usage
    pub is_used: bool,
    pub in_degree: usize,
    pub out_degree: usize,
    /// Whether the category sits on a cycle of the visible subgraph
    pub in_cycle: bool,
    pub layer: usize,
    pub position: Position,
}

/// A relation edge of the graph view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEdge {
    /// `e{n}`, where `n` is the edge's index among the included relations
    pub id: String,
    pub source: Category,
    pub target: Category,
    pub kind: RelationKind,
}

/// A laid-out subgraph of the category relations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    /// Nodes sorted by identifier
    pub nodes: Vec<ViewNode>,
    /// Edges in relation order
    pub edges: Vec<ViewEdge>,
    /// Node identifiers per layer, top to bottom
    pub layers: Vec<Vec<Category>>,
}

impl GraphView {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes
            .binary_search_by(|n| n.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// Number of nodes on a cycle.
    pub fn cycle_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.in_cycle).count()
    }
}

/// Builds the laid-out view of the relations touching the visible set.
///
/// A relation is included when either endpoint is visible. The result is a
/// pure function of its inputs.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use clientscope::inventory::Relation;
/// use clientscope::view::{build_view, LayoutConfig, VisibleSet};
///
/// let relations = vec![
///     Relation::depends("site.page", "site.base"),
///     Relation::depends("site.base", "site.core"),
///     Relation::depends("other.a", "other.b"),
/// ];
/// let used = BTreeSet::from(["site.page".to_string()]);
///
/// let view = build_view(&relations, &used, &VisibleSet::AllUsed, &LayoutConfig::default());
///
/// assert_eq!(view.edges.len(), 1);
/// assert_eq!(view.layers, vec![vec!["site.page".to_string()], vec!["site.base".to_string()]]);
/// ```
pub fn build_view(
    relations: &[Relation],
    used: &BTreeSet<Category>,
    visible: &VisibleSet,
    config: &LayoutConfig,
) -> GraphView {
    let effective = visible.effective(used);

    let included: Vec<&Relation> = relations
        .iter()
        .filter(|r| effective.contains(&r.from) || effective.contains(&r.to))
        .collect();

    let ids: Vec<&str> = included
        .iter()
        .flat_map(|r| [r.from.as_str(), r.to.as_str()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let position_of: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut forward: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    let mut in_degree = vec![0usize; ids.len()];
    let mut out_degree = vec![0usize; ids.len()];
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(ids.len(), included.len());
    let node_indices: Vec<NodeIndex> = ids.iter().map(|_| graph.add_node(())).collect();

    let mut edges = Vec::with_capacity(included.len());
    for (n, relation) in included.iter().enumerate() {
        let from = position_of[relation.from.as_str()];
        let to = position_of[relation.to.as_str()];
        forward[from].push(to);
        out_degree[from] += 1;
        in_degree[to] += 1;
        graph.add_edge(node_indices[from], node_indices[to], ());

        edges.push(ViewEdge {
            id: format!("e{n}"),
            source: relation.from.clone(),
            target: relation.to.clone(),
            kind: relation.kind,
        });
    }

    let mut in_cycle = vec![false; ids.len()];
    for scc in tarjan_scc(&graph) {
        let cyclic = scc.len() > 1 || scc.iter().any(|&idx| graph.contains_edge(idx, idx));
        if cyclic {
            for idx in scc {
                in_cycle[idx.index()] = true;
            }
        }
    }

    let is_used: Vec<bool> = ids.iter().map(|id| used.contains(*id)).collect();
    let layer_members = assign_layers(&forward, &in_degree, &is_used, config);

    let mut layer_of = vec![0usize; ids.len()];
    let mut positions = vec![Position::default(); ids.len()];
    for (k, members) in layer_members.iter().enumerate() {
        for (i, &node) in members.iter().enumerate() {
            layer_of[node] = k;
            positions[node] = config.position(k, i, members.len());
        }
    }

    let nodes: Vec<ViewNode> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| ViewNode {
            id: id.to_string(),
            is_used: is_used[i],
            in_degree: in_degree[i],
            out_degree: out_degree[i],
            in_cycle: in_cycle[i],
            layer: layer_of[i],
            position: positions[i],
        })
        .collect();

    let layers: Vec<Vec<Category>> = layer_members
        .iter()
        .map(|members| members.iter().map(|&n| ids[n].to_string()).collect())
        .collect();

    debug!(
        visible = effective.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        layers = layers.len(),
        "built graph view"
    );

    GraphView { nodes, edges, layers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<Category> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn build(relations: &[Relation], used: &[&str], visible: &VisibleSet) -> GraphView {
        build_view(relations, &set(used), visible, &LayoutConfig::default())
    }

    fn layer_of(view: &GraphView, id: &str) -> usize {
        view.node(id).map(|n| n.layer).unwrap_or(usize::MAX)
    }

    #[test]
    fn test_empty_input() {
        let view = build(&[], &[], &VisibleSet::AllUsed);
        assert!(view.is_empty());
        assert!(view.edges.is_empty());
        assert!(view.layers.is_empty());

        let view = build(&[], &["a"], &VisibleSet::focus("a"));
        assert!(view.is_empty());
    }

    #[test]
    fn test_no_visible_categories() {
        let relations = vec![Relation::depends("a", "b")];
        let view = build(&relations, &[], &VisibleSet::AllUsed);
        assert!(view.is_empty());
    }

    #[test]
    fn test_edge_filter_is_either_endpoint() {
        let relations = vec![
            Relation::depends("x", "a"),
            Relation::depends("a", "y"),
            Relation::depends("y", "z"),
        ];
        let view = build(&relations, &["a"], &VisibleSet::AllUsed);

        let ids: Vec<&str> = view.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e0", "e1"]);
        assert!(view.node("z").is_none());
        assert_eq!(view.nodes.len(), 3);
    }

    #[test]
    fn test_nodes_sorted_and_tagged() {
        let relations = vec![
            Relation::depends("c", "a"),
            Relation::embeds("b", "a"),
            Relation::depends("a", "d"),
        ];
        let view = build(&relations, &["a"], &VisibleSet::AllUsed);

        let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        let a = view.node("a").unwrap();
        assert!(a.is_used);
        assert_eq!(a.in_degree, 2);
        assert_eq!(a.out_degree, 1);
        assert!(!view.node("b").unwrap().is_used);
        assert_eq!(view.edges[1].kind, RelationKind::Embeds);
    }

    #[test]
    fn test_idempotent() {
        let relations = vec![
            Relation::depends("a", "b"),
            Relation::depends("b", "c"),
            Relation::embeds("c", "a"),
            Relation::depends("d", "b"),
        ];
        let visible = VisibleSet::focus("b");
        let first = build(&relations, &["a"], &visible);
        let second = build(&relations, &["a"], &visible);
        assert_eq!(first, second);
    }

    #[test]
    fn test_chain_layers_strictly_increase() {
        let relations = vec![
            Relation::depends("A", "B"),
            Relation::depends("B", "C"),
            Relation::depends("C", "D"),
        ];
        let view = build(&relations, &["A"], &VisibleSet::Expanded(set(&["A", "B", "C", "D"])));

        let a = layer_of(&view, "A");
        let b = layer_of(&view, "B");
        let c = layer_of(&view, "C");
        let d = layer_of(&view, "D");
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn test_same_layer_positions_distinct() {
        let relations = vec![
            Relation::depends("root", "x"),
            Relation::depends("root", "y"),
            Relation::depends("root", "z"),
        ];
        let view = build(&relations, &["root"], &VisibleSet::AllUsed);

        assert_eq!(view.layers[1], vec!["x", "y", "z"]);
        let xs: Vec<f64> = ["x", "y", "z"]
            .iter()
            .map(|id| view.node(id).unwrap().position.x)
            .collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert_eq!(view.node("x").unwrap().position.y, 250.0);
    }

    #[test]
    fn test_every_node_placed_once() {
        let relations = vec![
            Relation::depends("a", "b"),
            Relation::depends("b", "a"),
            Relation::depends("c", "d"),
            Relation::depends("d", "d"),
            Relation::depends("e", "a"),
        ];
        let view = build(&relations, &["a"], &VisibleSet::Expanded(set(&["a", "c", "e"])));

        let mut placed: Vec<&str> = view.layers.iter().flatten().map(String::as_str).collect();
        placed.sort_unstable();
        assert_eq!(placed, vec!["a", "b", "c", "d", "e"]);
        for node in &view.nodes {
            assert_eq!(view.layers[node.layer].iter().filter(|id| **id == node.id).count(), 1);
        }
    }

    #[test]
    fn test_in_cycle_flag() {
        let relations = vec![
            Relation::depends("a", "b"),
            Relation::depends("b", "a"),
            Relation::depends("b", "c"),
            Relation::depends("s", "s"),
        ];
        let view = build(&relations, &["a", "c", "s"], &VisibleSet::AllUsed);

        assert!(view.node("a").unwrap().in_cycle);
        assert!(view.node("b").unwrap().in_cycle);
        assert!(!view.node("c").unwrap().in_cycle);
        assert!(view.node("s").unwrap().in_cycle);
        assert_eq!(view.cycle_node_count(), 3);
    }

    #[test]
    fn test_cycle_outside_visible_subgraph() {
        // c <-> d is not visible from a
        let relations = vec![
            Relation::depends("a", "c"),
            Relation::depends("c", "d"),
            Relation::depends("d", "c"),
        ];
        let view = build(&relations, &[], &VisibleSet::focus("a"));
        assert_eq!(view.nodes.len(), 2);
        assert!(!view.node("c").unwrap().in_cycle);
    }

    #[test]
    fn test_expansion_only_grows_view() {
        let relations = vec![
            Relation::depends("a", "b"),
            Relation::depends("b", "c"),
            Relation::depends("c", "d"),
        ];
        let used = set(&["a"]);
        let config = LayoutConfig::default();
        let mut visible = VisibleSet::AllUsed;

        let before = build_view(&relations, &used, &visible, &config);
        visible.expand("b", &used);
        let middle = build_view(&relations, &used, &visible, &config);
        visible.expand("c", &used);
        let after = build_view(&relations, &used, &visible, &config);

        assert_eq!(before.edges.len(), 1);
        assert_eq!(middle.edges.len(), 2);
        assert_eq!(after.edges.len(), 3);
        for id in before.nodes.iter().map(|n| &n.id) {
            assert!(middle.node(id).is_some());
        }
    }

    #[test]
    fn test_fallback_roots_when_nothing_used() {
        let relations = vec![
            Relation::depends("a", "b"),
            Relation::depends("c", "b"),
            Relation::depends("b", "d"),
        ];
        let config = LayoutConfig {
            fallback_roots: 1,
            ..LayoutConfig::default()
        };
        let view = build_view(&relations, &BTreeSet::new(), &VisibleSet::focus("b"), &config);

        assert_eq!(view.layers[0], vec!["b"]);
        assert_eq!(view.layers[1], vec!["d"]);
        assert_eq!(view.layers[2], vec!["a", "c"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let relations = vec![Relation::embeds("a", "b")];
        let view = build(&relations, &["a"], &VisibleSet::AllUsed);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["nodes"][0]["isUsed"], true);
        assert_eq!(json["nodes"][0]["inDegree"], 0);
        assert_eq!(json["edges"][0]["kind"], "embeds");
        assert_eq!(json["edges"][0]["id"], "e0");
    }
}
