//! Graphviz DOT export for graph views.
//!
//! Nodes keep their computed layout through pinned `pos` attributes, so the
//! output renders as laid out with `neato -n` and still works with `dot`.

use crate::inventory::RelationKind;
use crate::view::GraphView;
use std::io::{self, Write};

const USED_COLOR: &str = "#d3f9d8";
const UNUSED_COLOR: &str = "#f1f3f5";
const CYCLE_COLOR: &str = "#ffa8a8";
const DEPENDS_COLOR: &str = "#4dabf7";
const EMBEDS_COLOR: &str = "#ff6b6b";

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Writes a graph view as a DOT digraph.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use clientscope::export::dot::write_dot;
/// use clientscope::inventory::Relation;
/// use clientscope::view::{build_view, LayoutConfig, VisibleSet};
///
/// let relations = vec![Relation::embeds("site.page", "site.icons")];
/// let used = BTreeSet::from(["site.page".to_string()]);
/// let view = build_view(&relations, &used, &VisibleSet::AllUsed, &LayoutConfig::default());
///
/// let mut out = Vec::new();
/// write_dot(&view, &mut out).unwrap();
/// let dot = String::from_utf8(out).unwrap();
/// assert!(dot.contains("\"site.page\" -> \"site.icons\""));
/// ```
pub fn write_dot<W: Write>(view: &GraphView, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "digraph clientlibs {{")?;
    writeln!(writer, "    rankdir=TB;")?;
    writeln!(writer, "    node [shape=box, style=\"rounded,filled\"];")?;

    for node in &view.nodes {
        let fill = if node.in_cycle {
            CYCLE_COLOR
        } else if node.is_used {
            USED_COLOR
        } else {
            UNUSED_COLOR
        };
        // DOT's y axis points up; the layout's points down.
        writeln!(
            writer,
            "    {} [fillcolor=\"{}\", pos=\"{:.0},{:.0}!\"];",
            quote(&node.id),
            fill,
            node.position.x,
            -node.position.y
        )?;
    }

    for edge in &view.edges {
        let (color, style) = match edge.kind {
            RelationKind::Depends => (DEPENDS_COLOR, "solid"),
            RelationKind::Embeds => (EMBEDS_COLOR, "dashed"),
        };
        writeln!(
            writer,
            "    {} -> {} [label=\"{}\", color=\"{}\", style={}];",
            quote(&edge.source),
            quote(&edge.target),
            edge.kind,
            color,
            style
        )?;
    }

    writeln!(writer, "}}")
}

/// Writes a graph view as DOT into a string.
pub fn to_dot_string(view: &GraphView) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_dot(view, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
