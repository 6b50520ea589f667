//! Visible category set for graph exploration.

use std::collections::BTreeSet;

use crate::inventory::Category;

/// Which categories the graph view is centred on.
///
/// The caller owns this value and threads it through successive
/// [`build_view`](super::build_view) calls; the builder never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisibleSet {
    /// Every category that has at least one usage.
    #[default]
    AllUsed,
    /// An explicit set grown by focus and expansion.
    Expanded(BTreeSet<Category>),
}

impl VisibleSet {
    /// Starts a fresh exploration at a single category.
    pub fn focus(category: impl Into<Category>) -> Self {
        VisibleSet::Expanded(BTreeSet::from([category.into()]))
    }

    /// Adds a category to the visible set.
    ///
    /// Expanding from [`VisibleSet::AllUsed`] seeds the explicit set with the
    /// used categories first, so the effective set never shrinks.
    ///
    /// ```rust
    /// use std::collections::BTreeSet;
    /// use clientscope::view::VisibleSet;
    ///
    /// let used = BTreeSet::from(["site.base".to_string()]);
    /// let mut visible = VisibleSet::AllUsed;
    /// visible.expand("site.extra", &used);
    ///
    /// let effective = visible.effective(&used);
    /// assert!(effective.contains("site.base"));
    /// assert!(effective.contains("site.extra"));
    /// ```
    pub fn expand(&mut self, category: impl Into<Category>, used: &BTreeSet<Category>) {
        let category = category.into();
        match self {
            VisibleSet::AllUsed => {
                let mut set = used.clone();
                set.insert(category);
                *self = VisibleSet::Expanded(set);
            }
            VisibleSet::Expanded(set) => {
                set.insert(category);
            }
        }
    }

    /// Returns to the default view of all used categories.
    pub fn reset(&mut self) {
        *self = VisibleSet::AllUsed;
    }

    /// The set of categories currently in force.
    pub fn effective<'a>(&'a self, used: &'a BTreeSet<Category>) -> &'a BTreeSet<Category> {
        match self {
            VisibleSet::AllUsed => used,
            VisibleSet::Expanded(set) => set,
        }
    }

    /// Returns true once focus or expansion replaced the default view.
    pub fn is_expanded(&self) -> bool {
        matches!(self, VisibleSet::Expanded(_))
    }
}
