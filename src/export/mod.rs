//! Export functionality for impact reports and graph views.
//!
//! Impact reports can be written as JSON, CSV or Markdown through the
//! [`Exporter`] trait; graph views can be written as Graphviz DOT with
//! [`dot::write_dot`].

pub mod csv;
pub mod dot;
pub mod json;
pub mod markdown;

use crate::analysis::Analysis;
use crate::impact::{CategoryImpact, Impact};
use crate::inventory::{Category, Clientlib};
use std::collections::HashSet;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - one row per impacted clientlib
    Csv,
    /// Markdown format - review checklists and tickets
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the impact analysis of one clientlib, borrowed from an
/// [`Analysis`].
#[derive(Debug, Clone)]
pub struct ExportData<'a> {
    /// The clientlib being changed
    pub target: &'a Clientlib,
    /// What the target itself requires
    pub dependencies: Vec<CategoryImpact<'a>>,
    /// What requires the target
    pub impact: Impact<'a>,
    /// Categories taking part in a relation cycle anywhere in the inventory
    pub cycle_members: HashSet<Category>,
}

impl<'a> ExportData<'a> {
    /// Runs dependency and impact analysis for `target`.
    pub fn new(analysis: &'a Analysis, target: &'a Clientlib) -> Self {
        let analyzer = analysis.analyzer();
        Self {
            target,
            dependencies: analyzer.dependencies_of(target),
            impact: analyzer.impact_of(target),
            cycle_members: analysis.graph().categories_in_cycles(),
        }
    }

    /// Returns true if `category` sits on a relation cycle.
    pub fn in_cycle(&self, category: &str) -> bool {
        self.cycle_members.contains(category)
    }

    /// Distinct clientlibs owning an impacted category.
    pub fn clientlibs_to_test(&self) -> Vec<&'a Clientlib> {
        self.impact.clientlibs()
    }

    /// Regression testing steps after changing the target.
    ///
    /// Empty when nothing is impacted.
    pub fn checklist(&self) -> Vec<String> {
        if self.impact.is_empty() {
            return Vec::new();
        }

        let mut direct = format!(
            "Test the {} directly impacted categories",
            self.impact.direct.len()
        );
        if self.impact.has_embeds() {
            direct.push_str(" (embedded code: changes are inlined)");
        }

        vec![
            direct,
            format!(
                "Run regression tests on the {} indirectly impacted categories",
                self.impact.indirect.len()
            ),
            "Check the components and pages using these clientlibs (HTL, JSP, dialogs)".to_string(),
        ]
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData<'_>,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData<'_>) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
