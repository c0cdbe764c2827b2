//! The serialized snapshot document.
//!
//! ```text
//! {
//!   categories: [{id, name, order}],
//!   items: [{id, name, categoryId, quantity, location, tags, notes, favorite, pos | null}],
//!   drawers: [{id, name, rows, cols}],
//!   updatedAt: RFC 3339 timestamp
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toolbox_inventory::{Category, Drawer, Inventory, Item, layout};

use super::r#trait::SnapshotError;
use crate::seed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    pub drawers: Vec<Drawer>,
    pub updated_at: DateTime<Utc>,
}

/// Shape accepted on decode: everything optional so that missing sections
/// can be reported (or defaulted) explicitly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingDocument {
    categories: Option<Vec<Category>>,
    items: Option<Vec<Item>>,
    drawers: Option<Vec<Drawer>>,
    updated_at: Option<DateTime<Utc>>,
}

impl IncomingDocument {
    fn decode(text: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(text).map_err(|e| SnapshotError::parse(e.to_string()))
    }

    fn finish(self, drawers: Vec<Drawer>) -> Result<SnapshotDocument, SnapshotError> {
        let categories = self
            .categories
            .ok_or_else(|| SnapshotError::parse("missing `categories`"))?;
        let items = self.items.ok_or_else(|| SnapshotError::parse("missing `items`"))?;
        layout::validate_drawers(&drawers).map_err(|e| SnapshotError::parse(e.to_string()))?;

        Ok(SnapshotDocument {
            categories,
            items,
            drawers,
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
        })
    }
}

impl SnapshotDocument {
    /// Snapshot of `inventory`, stamped with `now`.
    pub fn capture(inventory: &Inventory, now: DateTime<Utc>) -> Self {
        Self {
            categories: inventory.categories().to_vec(),
            items: inventory.items().to_vec(),
            drawers: inventory.drawers().to_vec(),
            updated_at: now,
        }
    }

    /// Decode a document written by [`SnapshotDocument::render`].
    ///
    /// Fails when the text is not valid JSON, when `categories`, `items` or
    /// `drawers` are missing, or when the drawer set is invalid. An empty
    /// drawer set is kept as is.
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let mut incoming = IncomingDocument::decode(text)?;
        let drawers = incoming
            .drawers
            .take()
            .ok_or_else(|| SnapshotError::parse("missing `drawers`"))?;
        incoming.finish(drawers)
    }

    /// Decode a document chosen for import.
    ///
    /// Like [`SnapshotDocument::parse`], except that missing or empty
    /// `drawers` fall back to the default layout.
    pub fn parse_import(text: &str) -> Result<Self, SnapshotError> {
        let mut incoming = IncomingDocument::decode(text)?;
        let drawers = match incoming.drawers.take() {
            Some(drawers) if !drawers.is_empty() => drawers,
            _ => {
                tracing::warn!("imported snapshot has no drawers; using the default layout");
                seed::default_drawers()
            }
        };
        incoming.finish(drawers)
    }

    /// Pretty-printed JSON.
    pub fn render(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// True when categories, items and drawers are equal (timestamps ignored).
    pub fn same_contents(&self, other: &Self) -> bool {
        self.categories == other.categories
            && self.items == other.items
            && self.drawers == other.drawers
    }

    pub fn into_parts(self) -> (Vec<Category>, Vec<Item>, Vec<Drawer>) {
        (self.categories, self.items, self.drawers)
    }

    pub fn into_inventory(self) -> Inventory {
        let (categories, items, drawers) = self.into_parts();
        Inventory::hydrate(categories, items, drawers)
    }
}
