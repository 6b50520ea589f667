//! JSON export implementation.
//!
//! Exports impact reports in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::impact::CategoryImpact;
use crate::inventory::{query::total_size_kb, RelationKind};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// The changed clientlib.
#[derive(Serialize)]
struct JsonTarget<'a> {
    path: &'a str,
    name: &'a str,
    categories: &'a [String],
    total_kb: f64,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    dependencies: usize,
    direct_impact: usize,
    indirect_impact: usize,
    total_impact: usize,
    clientlibs_to_test: usize,
    impacted_kb: f64,
    has_embeds: bool,
}

/// Serializable impacted category for JSON output.
#[derive(Serialize)]
struct JsonCategory<'a> {
    category: &'a str,
    #[serde(rename = "type")]
    kind: RelationKind,
    in_cycle: bool,
    clientlibs: Vec<&'a str>,
}

impl<'a> JsonCategory<'a> {
    fn from_impact(impact: &CategoryImpact<'a>, data: &ExportData<'_>) -> Self {
        Self {
            category: impact.category,
            kind: impact.kind,
            in_cycle: data.in_cycle(impact.category),
            clientlibs: impact.clientlibs.iter().map(|lib| lib.path.as_str()).collect(),
        }
    }

    fn list(rows: &[CategoryImpact<'a>], data: &ExportData<'_>) -> Vec<Self> {
        rows.iter().map(|row| Self::from_impact(row, data)).collect()
    }
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    clientlib: JsonTarget<'a>,
    summary: JsonSummary,
    dependencies: Vec<JsonCategory<'a>>,
    direct: Vec<JsonCategory<'a>>,
    indirect: Vec<JsonCategory<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checklist: Vec<String>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let to_test = data.clientlibs_to_test();

        let export = JsonExport {
            clientlib: JsonTarget {
                path: &data.target.path,
                name: &data.target.name,
                categories: &data.target.categories,
                total_kb: data.target.total_kb,
            },
            summary: JsonSummary {
                dependencies: data.dependencies.len(),
                direct_impact: data.impact.direct.len(),
                indirect_impact: data.impact.indirect.len(),
                total_impact: data.impact.total(),
                clientlibs_to_test: to_test.len(),
                impacted_kb: total_size_kb(to_test.iter().copied()),
                has_embeds: data.impact.has_embeds(),
            },
            dependencies: JsonCategory::list(&data.dependencies, data),
            direct: JsonCategory::list(&data.impact.direct, data),
            indirect: JsonCategory::list(&data.impact.indirect, data),
            checklist: data.checklist(),
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{isolated_analysis, sample_analysis};

    fn export_json(path: &str, analysis: &crate::analysis::Analysis) -> serde_json::Value {
        let target = analysis.resolve_clientlib(path).unwrap();
        let data = ExportData::new(analysis, target);
        let mut output = Vec::new();

        JsonExporter.export(&data, &mut output).unwrap();

        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_basic() {
        let analysis = sample_analysis();
        let parsed = export_json("/apps/site/base", &analysis);

        assert_eq!(parsed["clientlib"]["path"], "/apps/site/base");
        assert_eq!(parsed["clientlib"]["name"], "base");
        assert_eq!(parsed["clientlib"]["total_kb"], 12.5);
        assert_eq!(parsed["summary"]["dependencies"], 1);
        assert_eq!(parsed["summary"]["direct_impact"], 2);
        assert_eq!(parsed["summary"]["indirect_impact"], 1);
        assert_eq!(parsed["summary"]["total_impact"], 3);
        assert_eq!(parsed["summary"]["clientlibs_to_test"], 2);
        assert_eq!(parsed["summary"]["has_embeds"], true);
    }

    #[test]
    fn test_json_export_impact_lists() {
        let analysis = sample_analysis();
        let parsed = export_json("/apps/site/base", &analysis);

        let direct = parsed["direct"].as_array().unwrap();
        assert_eq!(direct.len(), 2);
        assert_eq!(direct[0]["category"], "site.page");
        assert_eq!(direct[0]["type"], "depends");
        assert_eq!(direct[0]["clientlibs"][0], "/apps/site/page");
        assert_eq!(direct[0]["in_cycle"], true);
        assert_eq!(direct[1]["type"], "embeds");
        assert_eq!(direct[1]["in_cycle"], false);

        let indirect = parsed["indirect"].as_array().unwrap();
        assert_eq!(indirect[0]["category"], "site.landing");
        assert!(indirect[0]["clientlibs"].as_array().unwrap().is_empty());
        assert_eq!(indirect[0]["in_cycle"], true);

        assert_eq!(parsed["dependencies"][0]["category"], "core.vendor");
        assert_eq!(parsed["checklist"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_json_export_without_impact() {
        let analysis = isolated_analysis();
        let parsed = export_json("/apps/site/solo", &analysis);

        assert_eq!(parsed["summary"]["total_impact"], 0);
        assert!(parsed["direct"].as_array().unwrap().is_empty());
        assert!(parsed.get("checklist").is_none());
    }
}
