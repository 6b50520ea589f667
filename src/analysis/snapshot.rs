//! A loaded inventory together with its derived structures.

use serde::Serialize;
use tracing::info;

use crate::graph::RelationGraph;
use crate::impact::ImpactAnalyzer;
use crate::index::CategoryIndex;
use crate::inventory::{Clientlib, Inventory};
use crate::view::{build_view, GraphView, LayoutConfig, VisibleSet};

/// Computed counts over an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub clientlibs: usize,
    pub categories: usize,
    pub relations: usize,
    pub used_categories: usize,
    pub unused_categories: usize,
    pub total_usages: usize,
    pub cycles: usize,
    pub alerts: usize,
}

/// An inventory with its category index and relation graph.
///
/// Everything is built once in [`Analysis::new`] and never mutated; a new
/// inventory means a new `Analysis`.
///
/// # Example
///
/// ```rust
/// use clientscope::analysis::Analysis;
/// use clientscope::inventory::parse_str;
///
/// let inventory = parse_str(r#"{
///     "clientlibs": [
///         {"path": "/apps/site/base", "name": "base", "categories": ["site.base"]},
///         {"path": "/apps/site/page", "name": "page", "categories": ["site.page"],
///          "dependencies": ["site.base"]}
///     ],
///     "relations": [{"from": "site.page", "to": "site.base", "type": "depends"}],
///     "usages": {"site.page": [{"type": "HTL", "path": "/apps/site/page.html"}]}
/// }"#).unwrap();
///
/// let analysis = Analysis::new(inventory);
/// let base = analysis.resolve_clientlib("/apps/site/base").unwrap();
/// let impact = analysis.analyzer().impact_of(base);
///
/// assert_eq!(impact.direct[0].category, "site.page");
/// assert_eq!(impact.direct[0].paths(), vec!["/apps/site/page"]);
/// ```
#[derive(Debug, Clone)]
pub struct Analysis {
    inventory: Inventory,
    index: CategoryIndex,
    graph: RelationGraph,
}

impl Analysis {
    /// Builds the index and graph for an inventory.
    pub fn new(inventory: Inventory) -> Self {
        let index = CategoryIndex::build(&inventory);
        let graph = RelationGraph::build(&inventory.relations);
        info!(
            clientlibs = inventory.clientlibs.len(),
            categories = index.category_count(),
            relations = graph.edge_count(),
            used = index.used_categories().len(),
            "inventory indexed"
        );
        Self {
            inventory,
            index,
            graph,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    /// Impact analyzer borrowing this analysis.
    pub fn analyzer(&self) -> ImpactAnalyzer<'_> {
        ImpactAnalyzer::new(&self.inventory, &self.index, &self.graph)
    }

    /// Builds the graph view over this inventory's relations.
    pub fn build_view(&self, visible: &VisibleSet, config: &LayoutConfig) -> GraphView {
        build_view(
            &self.inventory.relations,
            self.index.used_categories(),
            visible,
            config,
        )
    }

    /// Finds a clientlib by exact path, falling back to the first search
    /// match on path or category.
    pub fn resolve_clientlib(&self, query: &str) -> Option<&Clientlib> {
        self.inventory.clientlib(query).or_else(|| {
            self.index
                .search_clientlibs(&self.inventory, query, 1)
                .into_iter()
                .next()
        })
    }

    /// Computed counts, independent of the pass-through summary.
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            clientlibs: self.inventory.clientlibs.len(),
            categories: self.index.category_count(),
            relations: self.inventory.relations.len(),
            used_categories: self.index.used_categories().len(),
            unused_categories: self.index.unused_categories().len(),
            total_usages: self.index.total_usages(),
            cycles: self.graph.detect_cycles().len(),
            alerts: self.inventory.alerts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Relation, Usage, UsageKind};

    fn sample() -> Analysis {
        let mut inventory = Inventory::default();
        inventory.clientlibs = vec![
            Clientlib::new("/apps/site/base", "base", ["site.base"]),
            Clientlib::new("/apps/site/page", "page", ["site.page"]),
            Clientlib::new("/libs/core/widgets", "widgets", ["core.widgets"]),
        ];
        inventory.relations = vec![
            Relation::depends("site.page", "site.base"),
            Relation::embeds("site.base", "core.widgets"),
            Relation::depends("core.widgets", "site.base"),
        ];
        inventory.usages.insert(
            "site.page".to_string(),
            vec![Usage::new(UsageKind::Htl, "/apps/site/page.html")],
        );
        inventory.usages.insert("site.base".to_string(), vec![]);
        Analysis::new(inventory)
    }

    #[test]
    fn test_resolve_exact_path() {
        let analysis = sample();
        let lib = analysis.resolve_clientlib("/apps/site/page").unwrap();
        assert_eq!(lib.name, "page");
    }

    #[test]
    fn test_resolve_by_search() {
        let analysis = sample();
        let lib = analysis.resolve_clientlib("widgets").unwrap();
        assert_eq!(lib.path, "/libs/core/widgets");

        let lib = analysis.resolve_clientlib("site.base").unwrap();
        assert_eq!(lib.path, "/apps/site/base");

        assert!(analysis.resolve_clientlib("nothing").is_none());
        assert!(analysis.resolve_clientlib("").is_none());
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.clientlibs, 3);
        assert_eq!(summary.categories, 3);
        assert_eq!(summary.relations, 3);
        assert_eq!(summary.used_categories, 1);
        assert_eq!(summary.total_usages, 1);
        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.alerts, 0);
    }

    #[test]
    fn test_view_uses_used_categories() {
        let analysis = sample();
        let view = analysis.build_view(&VisibleSet::AllUsed, &LayoutConfig::default());
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.layers[0], vec!["site.page"]);
    }

    #[test]
    fn test_analyzer_runs_over_cycle() {
        let analysis = sample();
        let impact = analysis.analyzer().compute_impact(&["core.widgets"]);
        let direct: Vec<&str> = impact.direct.iter().map(|d| d.category).collect();
        let indirect: Vec<&str> = impact.indirect.iter().map(|d| d.category).collect();
        assert_eq!(direct, vec!["site.base"]);
        assert_eq!(indirect, vec!["site.page", "core.widgets"]);
    }
}
