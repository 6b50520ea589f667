//! clientscope CLI
//!
//! Loads an inventory file and prints clientlib tables, usages, impact
//! reports, graph views and alerts.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clientscope::inventory::SortKey;

mod commands;

#[derive(Parser)]
#[command(name = "clientscope")]
#[command(version)]
#[command(about = "Clientlib category dependency and impact analyzer", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of the impact report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

/// Output format of the graph view
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Json,
    Dot,
}

#[derive(Subcommand)]
enum Commands {
    /// Show inventory counts
    Summary {
        /// Inventory JSON file
        inventory: PathBuf,
    },
    /// List clientlibs, filtered and sorted
    Clientlibs {
        inventory: PathBuf,

        /// Keep clientlibs whose name, path or category contains this term
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort column: relations or size
        #[arg(short, long, default_value = "relations")]
        sort: SortKey,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    /// List categories by usage count, or the usages of one category
    Usages {
        inventory: PathBuf,

        /// Keep categories containing this term
        #[arg(short, long)]
        filter: Option<String>,

        /// Show the usages of this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show what a change to a clientlib impacts
    Impact {
        inventory: PathBuf,

        /// Clientlib path, or a term matching a path or category
        target: String,

        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Show the laid-out category graph
    Graph {
        inventory: PathBuf,

        /// Start a fresh exploration at this category
        #[arg(long)]
        focus: Option<String>,

        /// Add categories to the visible set (repeatable)
        #[arg(long)]
        expand: Vec<String>,

        #[arg(long, value_enum, default_value_t = GraphFormat::Text)]
        format: GraphFormat,

        /// Horizontal spacing between nodes of a layer
        #[arg(long, value_parser = positive_spacing)]
        h_spacing: Option<f64>,

        /// Vertical spacing between layers
        #[arg(long, value_parser = positive_spacing)]
        v_spacing: Option<f64>,

        /// Maximum number of layers before the overflow layer
        #[arg(long)]
        max_layers: Option<usize>,
    },
    /// Suggest categories matching a term
    Suggest {
        inventory: PathBuf,

        term: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show alerts grouped by level, with recommendations
    Alerts { inventory: PathBuf },
}

/// Parses a layout spacing, which must be a finite number above zero.
fn positive_spacing(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("spacing must be greater than 0, got {}", s))
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Summary { inventory } => commands::summary(&inventory),
        Commands::Clientlibs {
            inventory,
            filter,
            sort,
            asc,
        } => commands::clientlibs(&inventory, filter.as_deref().unwrap_or(""), sort, asc),
        Commands::Usages {
            inventory,
            filter,
            category,
        } => commands::usages(
            &inventory,
            filter.as_deref().unwrap_or(""),
            category.as_deref(),
        ),
        Commands::Impact {
            inventory,
            target,
            format,
        } => commands::impact(&inventory, &target, format),
        Commands::Graph {
            inventory,
            focus,
            expand,
            format,
            h_spacing,
            v_spacing,
            max_layers,
        } => {
            let overrides = commands::LayoutOverrides {
                h_spacing,
                v_spacing,
                max_layers,
            };
            commands::graph(&inventory, focus.as_deref(), &expand, format, overrides)
        }
        Commands::Suggest {
            inventory,
            term,
            limit,
        } => commands::suggest(&inventory, &term, limit),
        Commands::Alerts { inventory } => commands::alerts(&inventory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_spacing() {
        assert_eq!(positive_spacing("120"), Ok(120.0));
        assert_eq!(positive_spacing("0.5"), Ok(0.5));
        assert!(positive_spacing("0").is_err());
        assert!(positive_spacing("-40").is_err());
        assert!(positive_spacing("NaN").is_err());
        assert!(positive_spacing("wide").is_err());
    }

    #[test]
    fn test_graph_rejects_zero_spacing() {
        let parsed = Cli::try_parse_from(["clientscope", "graph", "inv.json", "--h-spacing", "0"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["clientscope", "graph", "inv.json", "--v-spacing=-1"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["clientscope", "graph", "inv.json", "--h-spacing", "80"]).unwrap();
        match cli.command {
            Commands::Graph { h_spacing, .. } => assert_eq!(h_spacing, Some(80.0)),
            _ => panic!("expected the graph command"),
        }
    }
}
