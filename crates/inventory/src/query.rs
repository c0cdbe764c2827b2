//! Query engine: filter composition and display ordering over items.
//!
//! Stateless. Every supplied criterion narrows the result (logical AND) and
//! the output is always ordered by name, whatever the filters were.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use toolbox_core::CategoryId;

use crate::model::{Category, Item};

/// Filters applied by [`query`]. The default imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCriteria {
    pub category_id: Option<CategoryId>,
    pub favorite_only: bool,
    /// Exact, case-sensitive tag membership.
    pub tag: Option<String>,
    /// Case-insensitive substring over name, notes, location and tags.
    pub text: Option<String>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn favorites(mut self) -> Self {
        self.favorite_only = true;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Lowercased search text, or `None` when it is absent or blank.
    fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches_with(item, self.needle().as_deref())
    }

    fn matches_with(&self, item: &Item, needle: Option<&str>) -> bool {
        if let Some(category_id) = &self.category_id {
            if item.category_id.as_ref() != Some(category_id) {
                return false;
            }
        }
        if self.favorite_only && !item.favorite {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !item.has_tag(tag) {
                return false;
            }
        }
        match needle {
            Some(needle) => item.search_text().to_lowercase().contains(needle),
            None => true,
        }
    }
}

/// Items matching `criteria`, ordered by [`collate`] on name.
///
/// The sort is stable: equal names keep their collection order.
pub fn query<'a>(items: &'a [Item], criteria: &QueryCriteria) -> Vec<&'a Item> {
    let needle = criteria.needle();
    let mut matched: Vec<&Item> = items
        .iter()
        .filter(|item| criteria.matches_with(item, needle.as_deref()))
        .collect();
    matched.sort_by(|a, b| collate(&a.name, &b.name));
    matched
}

/// Locale-style string ordering.
///
/// Letters compare case-insensitively first; only names that differ purely
/// by case fall back to a case comparison, lowercase first (`"apple"` <
/// `"Apple"` < `"banana"`).
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    primary.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            })
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}

/// Every distinct tag in use, sorted (the options of a tag filter).
pub fn all_tags(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|i| i.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Categories in display order (`order` ascending, ties in collection order).
pub fn categories_by_order(categories: &[Category]) -> Vec<&Category> {
    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by_key(|c| c.order);
    sorted
}
