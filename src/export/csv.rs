//! CSV export implementation.
//!
//! Exports impact reports in CSV format for spreadsheet use, one row per
//! (category, clientlib) pair.

use super::{ExportData, Exporter};
use crate::impact::CategoryImpact;
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    /// Writes the rows of one category. A category no clientlib publishes
    /// still gets a row, with empty clientlib columns.
    fn write_category<W: Write>(
        writer: &mut W,
        relation: &str,
        impact: &CategoryImpact<'_>,
        in_cycle: bool,
    ) -> io::Result<()> {
        if impact.clientlibs.is_empty() {
            return writeln!(
                writer,
                "{},{},{},{},,,",
                relation,
                Self::escape_field(impact.category),
                impact.kind,
                in_cycle
            );
        }

        for lib in &impact.clientlibs {
            writeln!(
                writer,
                "{},{},{},{},{},{},{:.2}",
                relation,
                Self::escape_field(impact.category),
                impact.kind,
                in_cycle,
                Self::escape_field(&lib.path),
                Self::escape_field(&lib.name),
                lib.total_kb
            )?;
        }
        Ok(())
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        // Write header
        writeln!(
            writer,
            "relation,category,type,in_cycle,clientlib_path,clientlib_name,total_kb"
        )?;

        let sections = [
            ("dependency", &data.dependencies),
            ("direct", &data.impact.direct),
            ("indirect", &data.impact.indirect),
        ];
        for (relation, rows) in sections {
            for row in rows {
                Self::write_category(writer, relation, row, data.in_cycle(row.category))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{isolated_analysis, sample_analysis};

    fn export_csv(path: &str, analysis: &crate::analysis::Analysis) -> String {
        let target = analysis.resolve_clientlib(path).unwrap();
        let data = ExportData::new(analysis, target);
        let mut output = Vec::new();

        CsvExporter.export(&data, &mut output).unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_csv_export_basic() {
        let analysis = sample_analysis();
        let csv_str = export_csv("/apps/site/base", &analysis);
        let lines: Vec<&str> = csv_str.lines().collect();

        // Header + 1 dependency + 2 direct + 1 indirect
        assert_eq!(lines.len(), 5);

        assert_eq!(
            lines[0],
            "relation,category,type,in_cycle,clientlib_path,clientlib_name,total_kb"
        );
        assert_eq!(
            lines[1],
            "dependency,core.vendor,depends,false,/libs/core/vendor,vendor,0.00"
        );
        assert_eq!(
            lines[2],
            "direct,site.page,depends,true,/apps/site/page,page,0.00"
        );
    }

    #[test]
    fn test_csv_escaping() {
        let analysis = sample_analysis();
        let csv_str = export_csv("/apps/site/base", &analysis);

        assert!(csv_str.contains("direct,site.blog,embeds,false,/apps/site/blog,\"blog, news\",0.00"));
    }

    #[test]
    fn test_csv_unpublished_category() {
        let analysis = sample_analysis();
        let csv_str = export_csv("/apps/site/base", &analysis);

        assert!(csv_str.lines().any(|l| l == "indirect,site.landing,depends,true,,,"));
    }

    #[test]
    fn test_csv_header_only_without_impact() {
        let analysis = isolated_analysis();
        let csv_str = export_csv("/apps/site/solo", &analysis);
        assert_eq!(csv_str.lines().count(), 1);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(CsvExporter::escape_field("simple"), "simple");
        assert_eq!(CsvExporter::escape_field("with,comma"), "\"with,comma\"");
        assert_eq!(
            CsvExporter::escape_field("with\"quote"),
            "\"with\"\"quote\""
        );
        assert_eq!(
            CsvExporter::escape_field("with\nnewline"),
            "\"with\nnewline\""
        );
    }
}
