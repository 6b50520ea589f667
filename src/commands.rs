//! CLI command implementations.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use clientscope::alerts::{alerts_by_level, recommend};
use clientscope::analysis::Analysis;
use clientscope::export::{self, dot, ExportData, ExportFormat};
use clientscope::impact::CategoryImpact;
use clientscope::inventory::{
    filter_clientlibs, format_kb, parse_file, query::total_size_kb, sort_clientlibs, validate,
    Category, SortKey, SortOrder,
};
use clientscope::view::{GraphView, LayoutConfig, VisibleSet};

use crate::{GraphFormat, ReportFormat};

/// CLI overrides of the default layout geometry.
pub struct LayoutOverrides {
    pub h_spacing: Option<f64>,
    pub v_spacing: Option<f64>,
    pub max_layers: Option<usize>,
}

impl LayoutOverrides {
    fn apply(&self, mut config: LayoutConfig) -> LayoutConfig {
        if let Some(h) = self.h_spacing {
            config.h_spacing = h;
        }
        if let Some(v) = self.v_spacing {
            config.v_spacing = v;
        }
        if let Some(max) = self.max_layers {
            config.max_layers = max;
        }
        config
    }
}

fn load(path: &Path) -> Result<Analysis> {
    let inventory = parse_file(path)
        .with_context(|| format!("Failed to load inventory from {}", path.display()))?;
    if let Err(e) = validate(&inventory) {
        warn!(path = %path.display(), "{}; the first entry is used", e);
    }
    if inventory.is_empty() {
        warn!(path = %path.display(), "inventory is empty");
    }
    Ok(Analysis::new(inventory))
}

/// Print pass-through and computed counts.
pub fn summary(path: &Path) -> Result<()> {
    let analysis = load(path)?;
    let computed = analysis.summary();
    let reported = &analysis.inventory().summary;

    println!("📦 Inventory: {}", path.display());
    println!();
    println!("  Clientlibs:         {}", computed.clientlibs);
    println!("  Categories:         {}", computed.categories);
    println!("  Relations:          {}", computed.relations);
    println!("  Used categories:    {}", computed.used_categories);
    println!("  Unused categories:  {}", computed.unused_categories);
    println!("  Usages:             {}", computed.total_usages);
    println!("  Cycles:             {}", computed.cycles);
    println!("  Alerts:             {}", computed.alerts);

    let total_kb = total_size_kb(&analysis.inventory().clientlibs);
    println!("  Total size:         {}", format_kb(total_kb));

    let pass_through = [
        ("clientlibs", reported.total_clientlibs),
        ("categories", reported.total_categories),
        ("relations", reported.total_relations),
        ("alerts", reported.alerts_count),
    ];
    if pass_through.iter().any(|(_, v)| v.is_some()) || !reported.extra.is_empty() {
        println!();
        println!("  Reported by the scan:");
        for (label, value) in pass_through {
            if let Some(value) = value {
                println!("    {:<18}{}", label, value);
            }
        }
        for (key, value) in &reported.extra {
            println!("    {:<18}{}", key, value);
        }
    }

    Ok(())
}

/// Print the clientlib table.
pub fn clientlibs(path: &Path, filter: &str, sort: SortKey, asc: bool) -> Result<()> {
    let analysis = load(path)?;
    let mut rows = filter_clientlibs(&analysis.inventory().clientlibs, filter);
    let order = if asc {
        SortOrder::Ascending
    } else {
        SortOrder::Descending
    };
    sort_clientlibs(&mut rows, sort, order);

    println!(
        "{:<60} {:>5} {:>5} {:>12}  {}",
        "PATH", "DEPS", "EMBED", "SIZE", "CATEGORIES"
    );
    for lib in &rows {
        let jquery = lib
            .jquery_summary()
            .map(|summary| format!(" [{}]", summary))
            .unwrap_or_default();
        println!(
            "{:<60} {:>5} {:>5} {:>12}  {}{}",
            lib.path,
            lib.dependencies.len(),
            lib.embed.len(),
            format_kb(lib.total_kb),
            lib.categories.join(", "),
            jquery
        );
    }
    println!();
    println!(
        "{} of {} clientlibs, {}",
        rows.len(),
        analysis.inventory().clientlibs.len(),
        format_kb(total_size_kb(rows.iter().copied()))
    );

    Ok(())
}

/// Print categories by usage count, or one category's usage list.
pub fn usages(path: &Path, filter: &str, category: Option<&str>) -> Result<()> {
    let analysis = load(path)?;
    let index = analysis.index();

    if let Some(category) = category {
        let usages = index.usages_for(analysis.inventory(), category);
        println!("📂 {} ({} usages)", category, usages.len());
        for usage in usages {
            println!("  {:<7} {}", usage.kind, usage.path);
        }
        if usages.is_empty() {
            println!("  No usage found.");
        }
        return Ok(());
    }

    let rows = index.categories_by_usage(filter);
    for (category, count) in &rows {
        println!("{:>6}  {}", count, category);
    }
    println!();
    println!(
        "{} categories, {} usages",
        rows.len(),
        rows.iter().map(|(_, count)| count).sum::<usize>()
    );

    Ok(())
}

fn print_categories(
    title: &str,
    rows: &[CategoryImpact<'_>],
    data: &ExportData<'_>,
    badge: impl Fn(&CategoryImpact<'_>) -> String,
) {
    if rows.is_empty() {
        return;
    }
    println!("{} ({}):", title, rows.len());
    for row in rows {
        let cycle = if data.in_cycle(row.category) { " 🔄 cycle" } else { "" };
        println!("  {} {}{}", badge(row), row.category, cycle);
        if row.clientlibs.is_empty() {
            println!("      (no clientlib publishes this category)");
        }
        for lib in &row.clientlibs {
            println!("      📄 {}", lib.path);
        }
    }
    println!();
}

/// Print or export the impact report of one clientlib.
pub fn impact(path: &Path, target: &str, format: ReportFormat) -> Result<()> {
    let analysis = load(path)?;
    let Some(lib) = analysis.resolve_clientlib(target) else {
        bail!("No clientlib matches '{}'", target);
    };
    info!(clientlib = %lib.path, "resolved impact target");

    let data = ExportData::new(&analysis, lib);
    let export_format = match format {
        ReportFormat::Text => None,
        ReportFormat::Json => Some(ExportFormat::Json),
        ReportFormat::Csv => Some(ExportFormat::Csv),
        ReportFormat::Markdown => Some(ExportFormat::Markdown),
    };
    if let Some(export_format) = export_format {
        let mut stdout = std::io::stdout().lock();
        export::export(export_format, &data, &mut stdout)
            .with_context(|| format!("Failed to write {} report", export_format))?;
        return Ok(());
    }

    println!("📦 {} ({})", lib.name, lib.path);
    println!("   Categories: {}", lib.categories.join(", "));
    println!("   Size: {}", format_kb(lib.total_kb));
    println!();

    print_categories("Dependencies", &data.dependencies, &data, |d| format!("[{}]", d.kind));
    print_categories("Direct impact", &data.impact.direct, &data, |d| {
        if d.kind == clientscope::inventory::RelationKind::Embeds {
            "[embeds ⚠️ ]".to_string()
        } else {
            format!("[{}]", d.kind)
        }
    });
    print_categories("Indirect impact", &data.impact.indirect, &data, |_| {
        "[cascade]".to_string()
    });

    let checklist = data.checklist();
    if checklist.is_empty() {
        println!("✅ No impact detected: no other category requires this clientlib.");
        return Ok(());
    }

    println!(
        "⚠️  {} categories impacted, {} clientlibs to test",
        data.impact.total(),
        data.clientlibs_to_test().len()
    );
    println!();
    println!("Testing checklist:");
    for (i, step) in checklist.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    Ok(())
}

fn print_view(view: &GraphView, visible: &VisibleSet, used: &BTreeSet<Category>) {
    let shown = visible.effective(used).len();
    if visible.is_expanded() {
        println!("Visible: {} explored categories", shown);
    } else {
        println!("Visible: all {} used categories", shown);
    }
    println!();

    if view.is_empty() {
        println!("No relation touches the visible categories.");
        return;
    }

    for (k, layer) in view.layers.iter().enumerate() {
        println!("Layer {}:", k);
        for id in layer {
            let Some(node) = view.node(id) else {
                continue;
            };
            let mut flags = Vec::new();
            if node.is_used {
                flags.push("used");
            }
            if node.in_cycle {
                flags.push("cycle");
            }
            println!(
                "  {:<50} in:{:<3} out:{:<3} ({:.0}, {:.0}) {}",
                node.id,
                node.in_degree,
                node.out_degree,
                node.position.x,
                node.position.y,
                flags.join(",")
            );
        }
    }
    println!();
    println!(
        "{} nodes, {} edges, {} layers, {} nodes on cycles",
        view.nodes.len(),
        view.edges.len(),
        view.layers.len(),
        view.cycle_node_count()
    );
}

/// Print the laid-out category graph.
pub fn graph(
    path: &Path,
    focus: Option<&str>,
    expand: &[String],
    format: GraphFormat,
    overrides: LayoutOverrides,
) -> Result<()> {
    let analysis = load(path)?;
    let used = analysis.index().used_categories();

    let mut visible = match focus {
        Some(category) => VisibleSet::focus(category),
        None => VisibleSet::AllUsed,
    };
    for category in expand {
        if !analysis.index().contains(category) {
            warn!(category = %category, "expanding a category the inventory never mentions");
        }
        visible.expand(category.as_str(), used);
    }

    let config = overrides.apply(LayoutConfig::default());
    let view = analysis.build_view(&visible, &config);

    match format {
        GraphFormat::Text => print_view(&view, &visible, used),
        GraphFormat::Json => {
            let json = serde_json::to_string_pretty(&view).context("Failed to serialize graph view")?;
            println!("{}", json);
        }
        GraphFormat::Dot => {
            let mut stdout = std::io::stdout().lock();
            dot::write_dot(&view, &mut stdout).context("Failed to write DOT output")?;
        }
    }

    Ok(())
}

/// Print category suggestions for a search term.
pub fn suggest(path: &Path, term: &str, limit: usize) -> Result<()> {
    let analysis = load(path)?;
    let index = analysis.index();
    let suggestions = index.suggest_categories(analysis.inventory(), term, limit);

    if suggestions.is_empty() {
        println!("No category matches '{}'.", term);
        return Ok(());
    }
    for category in suggestions {
        let count = index.usage_count(category);
        if count > 0 {
            println!("  {:<50} {} usages", category, count);
        } else {
            println!("  {:<50} unused", category);
        }
    }

    Ok(())
}

/// Print alerts grouped by level, then recommendations.
pub fn alerts(path: &Path) -> Result<()> {
    let analysis = load(path)?;
    let alerts = &analysis.inventory().alerts;

    if alerts.is_empty() {
        println!("✅ No alert reported.");
    }
    for (level, group) in alerts_by_level(alerts) {
        println!("{} {} ({})", level.icon(), level, group.len());
        for alert in group {
            println!("  • {}", alert.title);
            if !alert.description.is_empty() {
                println!("    {}", alert.description);
            }
            if !alert.action.is_empty() {
                println!("    → {}", alert.action);
            }
        }
        println!();
    }

    let recommendations = recommend(analysis.inventory());
    if recommendations.is_empty() {
        return Ok(());
    }
    println!("💡 Recommendations");
    println!();
    for rec in recommendations {
        println!("{} {}", rec.priority.icon(), rec.title);
        println!("  {}", rec.description);
        println!("  Impact: {}", rec.impact);
        for action in &rec.actions {
            println!("    - {}", action);
        }
        println!("  Effort: {}  Benefit: {}", rec.effort.label(), rec.benefit);
        println!();
    }

    Ok(())
}
