//! Filtering and sorting over the clientlib list.

use std::cmp::Ordering;
use std::str::FromStr;

use super::types::Clientlib;

/// Column the clientlib table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Declared dependencies plus embeds.
    #[default]
    Relations,
    /// Total size in kilobytes.
    Size,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relations" => Ok(SortKey::Relations),
            "size" => Ok(SortKey::Size),
            _ => Err(format!(
                "Unknown sort key: '{}'. Valid keys: relations, size",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Returns the clientlibs whose name, path or any category contains `term`
/// (case-insensitive). An empty term matches everything.
pub fn filter_clientlibs<'a>(clientlibs: &'a [Clientlib], term: &str) -> Vec<&'a Clientlib> {
    let term = term.to_lowercase();
    clientlibs
        .iter()
        .filter(|lib| {
            lib.name.to_lowercase().contains(&term)
                || lib.path.to_lowercase().contains(&term)
                || lib
                    .categories
                    .iter()
                    .any(|cat| cat.to_lowercase().contains(&term))
        })
        .collect()
}

/// Sorts clientlibs in place. The sort is stable, so equal rows keep their
/// inventory order.
pub fn sort_clientlibs(clientlibs: &mut [&Clientlib], key: SortKey, order: SortOrder) {
    clientlibs.sort_by(|a, b| {
        let cmp = match key {
            SortKey::Size => a.total_kb.partial_cmp(&b.total_kb).unwrap_or(Ordering::Equal),
            SortKey::Relations => a.relation_count().cmp(&b.relation_count()),
        };
        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Total size of the given clientlibs in kilobytes.
pub fn total_size_kb<'a>(clientlibs: impl IntoIterator<Item = &'a Clientlib>) -> f64 {
    clientlibs.into_iter().map(|lib| lib.total_kb).sum()
}

/// Formats a kilobyte figure for display.
pub fn format_kb(kb: f64) -> String {
    if kb >= 1024.0 {
        format!("{:.2} MB", kb / 1024.0)
    } else {
        format!("{:.2} KB", kb)
    }
}
