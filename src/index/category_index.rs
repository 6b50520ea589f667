//! Category lookup tables built from an inventory.
//!
//! Maps every known category to the clientlibs publishing it and keeps the
//! set of categories that are actually referenced by templates or dialogs.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::inventory::{Category, Clientlib, Inventory, Usage};

/// Lookup structures over one inventory.
///
/// Clientlibs are stored as positions into `Inventory::clientlibs`, so the
/// index never duplicates clientlib data and is only meaningful together with
/// the inventory it was built from.
///
/// # Example
///
/// ```rust
/// use clientscope::index::CategoryIndex;
/// use clientscope::inventory::{Clientlib, Inventory, Relation};
///
/// let mut inventory = Inventory::default();
/// inventory.clientlibs.push(Clientlib::new("/apps/site/base", "base", ["site.base"]));
/// inventory.relations.push(Relation::depends("site.page", "site.base"));
///
/// let index = CategoryIndex::build(&inventory);
/// assert_eq!(index.clientlibs_for(&inventory, "site.base").len(), 1);
/// assert!(index.clientlibs_for(&inventory, "site.page").is_empty());
/// assert!(index.clientlibs_for(&inventory, "unknown").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    /// Category -> positions of the clientlibs that publish it
    by_category: HashMap<Category, Vec<usize>>,
    /// Categories with at least one usage
    used: BTreeSet<Category>,
    /// Usage count per category present in the usage map
    usage_counts: HashMap<Category, usize>,
}

impl CategoryIndex {
    /// Builds the index.
    ///
    /// Categories referenced only by relations, `dependencies`/`embed`
    /// declarations or the usage map are registered with an empty clientlib
    /// list, so [`CategoryIndex::categories`] lists every category the
    /// inventory mentions.
    pub fn build(inventory: &Inventory) -> Self {
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();

        for (position, lib) in inventory.clientlibs.iter().enumerate() {
            for category in &lib.categories {
                by_category.entry(category.clone()).or_default().push(position);
            }
        }

        let referenced = inventory
            .clientlibs
            .iter()
            .flat_map(|lib| lib.dependencies.iter().chain(lib.embed.iter()))
            .chain(
                inventory
                    .relations
                    .iter()
                    .flat_map(|rel| [&rel.from, &rel.to]),
            )
            .chain(inventory.usages.keys());
        for category in referenced {
            by_category.entry(category.clone()).or_default();
        }

        let used: BTreeSet<Category> = inventory
            .usages
            .iter()
            .filter(|(_, usages)| !usages.is_empty())
            .map(|(category, _)| category.clone())
            .collect();

        let usage_counts = inventory
            .usages
            .iter()
            .map(|(category, usages)| (category.clone(), usages.len()))
            .collect();

        debug!(
            categories = by_category.len(),
            used = used.len(),
            "built category index"
        );

        Self {
            by_category,
            used,
            usage_counts,
        }
    }

    /// Positions of the clientlibs publishing `category`, in inventory order.
    pub fn clientlib_indices(&self, category: &str) -> &[usize] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Clientlibs publishing `category`, in inventory order.
    pub fn clientlibs_for<'a>(&self, inventory: &'a Inventory, category: &str) -> Vec<&'a Clientlib> {
        self.clientlib_indices(category)
            .iter()
            .filter_map(|&i| inventory.clientlibs.get(i))
            .collect()
    }

    /// Returns true if the category has at least one usage.
    pub fn is_used(&self, category: &str) -> bool {
        self.used.contains(category)
    }

    /// Categories with at least one usage, sorted.
    pub fn used_categories(&self) -> &BTreeSet<Category> {
        &self.used
    }

    /// Usages of `category`; empty for categories missing from the usage map.
    pub fn usages_for<'a>(&self, inventory: &'a Inventory, category: &str) -> &'a [Usage] {
        inventory
            .usages
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of usages of `category` (0 if unknown).
    pub fn usage_count(&self, category: &str) -> usize {
        self.usage_counts.get(category).copied().unwrap_or(0)
    }

    /// Total number of usage entries across all categories.
    pub fn total_usages(&self) -> usize {
        self.usage_counts.values().sum()
    }

    /// Categories present in the usage map with no usage, sorted.
    pub fn unused_categories(&self) -> Vec<&str> {
        let mut unused: Vec<&str> = self
            .usage_counts
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(category, _)| category.as_str())
            .collect();
        unused.sort_unstable();
        unused
    }

    /// Categories of the usage map matching `filter` (case-insensitive
    /// substring), most used first, ties by name.
    pub fn categories_by_usage(&self, filter: &str) -> Vec<(&str, usize)> {
        let filter = filter.to_lowercase();
        let mut rows: Vec<(&str, usize)> = self
            .usage_counts
            .iter()
            .filter(|(category, _)| category.to_lowercase().contains(&filter))
            .map(|(category, &count)| (category.as_str(), count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    /// Every category the inventory mentions, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.by_category.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Number of distinct categories.
    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }

    /// Returns true if the category is mentioned anywhere in the inventory.
    pub fn contains(&self, category: &str) -> bool {
        self.by_category.contains_key(category)
    }

    /// Suggests categories for a search term.
    ///
    /// Only categories published by at least one clientlib are suggested.
    /// Ordering: used categories first, then by the repository area of the
    /// first publishing clientlib (`/apps`, `/etc`, `/libs`, anything else),
    /// then alphabetically.
    pub fn suggest_categories<'a>(
        &'a self,
        inventory: &Inventory,
        term: &str,
        limit: usize,
    ) -> Vec<&'a str> {
        let term = term.to_lowercase();
        let mut matches: Vec<(&str, bool, u8)> = self
            .by_category
            .iter()
            .filter(|(category, libs)| !libs.is_empty() && category.to_lowercase().contains(&term))
            .map(|(category, libs)| {
                let priority = libs
                    .first()
                    .and_then(|&i| inventory.clientlibs.get(i))
                    .map_or(3, |lib| path_priority(&lib.path));
                (category.as_str(), self.is_used(category), priority)
            })
            .collect();

        matches.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.2.cmp(&b.2))
                .then_with(|| a.0.cmp(b.0))
        });
        matches.into_iter().take(limit).map(|(c, _, _)| c).collect()
    }

    /// Finds clientlibs whose path or any category contains `term`
    /// (case-insensitive), in inventory order.
    pub fn search_clientlibs<'a>(
        &self,
        inventory: &'a Inventory,
        term: &str,
        limit: usize,
    ) -> Vec<&'a Clientlib> {
        if term.is_empty() {
            return Vec::new();
        }
        let term = term.to_lowercase();
        inventory
            .clientlibs
            .iter()
            .filter(|lib| {
                lib.path.to_lowercase().contains(&term)
                    || lib
                        .categories
                        .iter()
                        .any(|cat| cat.to_lowercase().contains(&term))
            })
            .take(limit)
            .collect()
    }
}

/// Application code first, then design settings, then product code.
fn path_priority(path: &str) -> u8 {
    if path.starts_with("/apps") {
        0
    } else if path.starts_with("/etc") {
        1
    } else if path.starts_with("/libs") {
        2
    } else {
        3
    }
}
