//! Markdown export implementation.
//!
//! Exports impact reports in Markdown format for change reviews and
//! testing tickets.

use super::{ExportData, Exporter};
use crate::impact::CategoryImpact;
use crate::inventory::{format_kb, query::total_size_kb, RelationKind};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    fn write_table<W: Write>(
        writer: &mut W,
        title: &str,
        rows: &[CategoryImpact<'_>],
        data: &ExportData<'_>,
    ) -> io::Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        writeln!(writer, "## {} ({})", title, rows.len())?;
        writeln!(writer)?;
        writeln!(writer, "| Category | Type | Cycle | Clientlibs |")?;
        writeln!(writer, "|----------|------|-------|------------|")?;
        for row in rows {
            let paths = row.paths();
            let clientlibs = if paths.is_empty() {
                "-".to_string()
            } else {
                paths
                    .iter()
                    .map(|p| format!("`{}`", p))
                    .collect::<Vec<_>>()
                    .join("<br>")
            };
            let kind = match row.kind {
                RelationKind::Embeds => "embeds ⚠️",
                RelationKind::Depends => "depends",
            };
            let cycle = if data.in_cycle(row.category) { "🔄 yes" } else { "" };
            writeln!(
                writer,
                "| `{}` | {} | {} | {} |",
                row.category, kind, cycle, clientlibs
            )?;
        }
        writeln!(writer)
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let target = data.target;
        let to_test = data.clientlibs_to_test();

        // Title
        writeln!(writer, "# Impact Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Clientlib:** {} (`{}`)", target.name, target.path)?;
        if !target.categories.is_empty() {
            let categories: Vec<String> = target
                .categories
                .iter()
                .map(|c| format!("`{}`", c))
                .collect();
            writeln!(writer, "**Categories:** {}", categories.join(", "))?;
        }
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Dependencies | {} |", data.dependencies.len())?;
        writeln!(writer, "| Direct Impact | {} |", data.impact.direct.len())?;
        writeln!(writer, "| Indirect Impact | {} |", data.impact.indirect.len())?;
        writeln!(writer, "| Total Impact | {} |", data.impact.total())?;
        writeln!(writer, "| Clientlibs to Test | {} |", to_test.len())?;
        writeln!(
            writer,
            "| Impacted Size | {} |",
            format_kb(total_size_kb(to_test.iter().copied()))
        )?;
        writeln!(writer)?;

        Self::write_table(writer, "Dependencies", &data.dependencies, data)?;
        Self::write_table(writer, "Direct Impact", &data.impact.direct, data)?;
        Self::write_table(writer, "Indirect Impact", &data.impact.indirect, data)?;

        // Testing checklist
        writeln!(writer, "## Testing Checklist")?;
        writeln!(writer)?;
        let checklist = data.checklist();
        if checklist.is_empty() {
            writeln!(
                writer,
                "No impact detected: no other category requires this clientlib."
            )?;
        } else {
            for (i, step) in checklist.iter().enumerate() {
                writeln!(writer, "{}. {}", i + 1, step)?;
            }
        }
        writeln!(writer)?;

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by clientscope*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{isolated_analysis, sample_analysis};

    fn export_markdown(path: &str, analysis: &crate::analysis::Analysis) -> String {
        let target = analysis.resolve_clientlib(path).unwrap();
        let data = ExportData::new(analysis, target);
        let mut output = Vec::new();

        MarkdownExporter.export(&data, &mut output).unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_basic() {
        let analysis = sample_analysis();
        let md_str = export_markdown("/apps/site/base", &analysis);

        assert!(md_str.contains("# Impact Report"));
        assert!(md_str.contains("**Clientlib:** base (`/apps/site/base`)"));
        assert!(md_str.contains("**Categories:** `site.base`"));

        assert!(md_str.contains("| Direct Impact | 2 |"));
        assert!(md_str.contains("| Indirect Impact | 1 |"));
        assert!(md_str.contains("| Total Impact | 3 |"));
        assert!(md_str.contains("| Clientlibs to Test | 2 |"));
    }

    #[test]
    fn test_markdown_export_sections() {
        let analysis = sample_analysis();
        let md_str = export_markdown("/apps/site/base", &analysis);

        assert!(md_str.contains("## Summary"));
        assert!(md_str.contains("## Dependencies (1)"));
        assert!(md_str.contains("## Direct Impact (2)"));
        assert!(md_str.contains("## Indirect Impact (1)"));
        assert!(md_str.contains("## Testing Checklist"));
    }

    #[test]
    fn test_markdown_export_rows() {
        let analysis = sample_analysis();
        let md_str = export_markdown("/apps/site/base", &analysis);

        assert!(md_str.contains("| `site.blog` | embeds ⚠️ |  | `/apps/site/blog` |"));
        assert!(md_str.contains("| `core.vendor` | depends |  | `/libs/core/vendor` |"));
        assert!(md_str.contains("1. Test the 2 directly impacted categories"));
    }

    #[test]
    fn test_markdown_export_marks_cycles() {
        let analysis = sample_analysis();
        let md_str = export_markdown("/apps/site/base", &analysis);

        assert!(md_str.contains("| Category | Type | Cycle | Clientlibs |"));
        assert!(md_str.contains("| `site.page` | depends | 🔄 yes | `/apps/site/page` |"));
        assert!(md_str.contains("| `site.landing` | depends | 🔄 yes | - |"));
    }

    #[test]
    fn test_markdown_export_without_impact() {
        let analysis = isolated_analysis();
        let md_str = export_markdown("/apps/site/solo", &analysis);

        assert!(!md_str.contains("## Direct Impact"));
        assert!(!md_str.contains("## Dependencies"));
        assert!(md_str.contains("No impact detected"));
    }

    #[test]
    fn test_markdown_export_footer() {
        let analysis = sample_analysis();
        let md_str = export_markdown("/apps/site/page", &analysis);

        assert!(md_str.contains("---"));
        assert!(md_str.contains("*Generated by clientscope*"));
    }
}
