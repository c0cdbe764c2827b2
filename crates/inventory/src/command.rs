//! Commands accepted by the inventory and the events they produce.

use serde::{Deserialize, Serialize};

use toolbox_core::{CategoryId, DrawerId, ItemId};
use toolbox_events::Event;

use crate::model::{Category, Drawer, Item, SlotPosition};

/// User-editable fields of an item, as submitted by an edit form.
///
/// `id` distinguishes an edit of an existing item from a creation. Text
/// fields are taken raw and normalized by the store; `tags` is the
/// comma-delimited text a person types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub id: Option<ItemId>,
    pub name: String,
    pub category_id: Option<CategoryId>,
    /// `None` means "not specified" and becomes 1.
    pub quantity: Option<i64>,
    pub location: String,
    pub tags: String,
    pub notes: String,
    pub favorite: bool,
    /// An explicit new placement; `None` keeps the current one.
    pub pos: Option<SlotPosition>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, category_id: impl Into<CategoryId>) -> Self {
        Self {
            name: name.into(),
            category_id: Some(category_id.into()),
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing item, for editing.
    pub fn edit(item: &Item) -> Self {
        Self {
            id: Some(item.id.clone()),
            name: item.name.clone(),
            category_id: item.category_id.clone(),
            quantity: Some(i64::from(item.quantity)),
            location: item.location.clone(),
            tags: item.tags.join(","),
            notes: item.notes.clone(),
            favorite: item.favorite,
            pos: None,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn with_pos(mut self, pos: SlotPosition) -> Self {
        self.pos = Some(pos);
        self
    }
}

/// Split comma-delimited tag text into trimmed, non-empty tags.
///
/// Order and duplicates are kept as typed.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Mutation commands. Ids for new entities are resolved before a command is
/// built, so handling stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCommand {
    UpsertItem { item_id: ItemId, draft: ItemDraft },
    DeleteItem { item_id: ItemId },
    SetItemCategory { item_id: ItemId, category_id: Option<CategoryId> },
    AddCategory { category_id: CategoryId, name: String },
    RenameCategory { category_id: CategoryId, name: String },
    DeleteCategory { category_id: CategoryId },
    PlaceItem { item_id: ItemId, pos: Option<SlotPosition> },
    ReplaceDrawers { drawers: Vec<Drawer> },
    /// Replace the whole state with a loaded snapshot.
    Restore {
        categories: Vec<Category>,
        items: Vec<Item>,
        drawers: Vec<Drawer>,
    },
}

/// Why an item lost its placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnplaceReason {
    /// Explicitly cleared.
    Cleared,
    /// Another item claimed the slot.
    Evicted { by: ItemId },
    /// The drawer was removed or shrunk past the slot.
    Reconciled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    ItemCreated { item: Item },
    ItemUpdated { item: Item },
    ItemDeleted { item_id: ItemId },
    ItemCategoryChanged { item_id: ItemId, category_id: Option<CategoryId> },
    /// The item's category was deleted.
    ItemUncategorized { item_id: ItemId, former: CategoryId },
    CategoryAdded { category: Category },
    CategoryRenamed { category_id: CategoryId, name: String },
    CategoryDeleted { category_id: CategoryId },
    ItemPlaced {
        item_id: ItemId,
        pos: SlotPosition,
        from: Option<SlotPosition>,
    },
    ItemUnplaced {
        item_id: ItemId,
        from: SlotPosition,
        reason: UnplaceReason,
    },
    DrawersReplaced { drawers: Vec<Drawer> },
    Restored {
        categories: Vec<Category>,
        items: Vec<Item>,
        drawers: Vec<Drawer>,
    },
}

impl InventoryEvent {
    /// True for placements cleared by drawer reconciliation.
    pub fn is_reconciliation(&self) -> bool {
        matches!(
            self,
            InventoryEvent::ItemUnplaced {
                reason: UnplaceReason::Reconciled,
                ..
            }
        )
    }

    /// Drawer touched by a placement event, if any.
    pub fn drawer_id(&self) -> Option<&DrawerId> {
        match self {
            InventoryEvent::ItemPlaced { pos, .. } => Some(&pos.drawer_id),
            InventoryEvent::ItemUnplaced { from, .. } => Some(&from.drawer_id),
            _ => None,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemCreated { .. } => "inventory.item.created",
            InventoryEvent::ItemUpdated { .. } => "inventory.item.updated",
            InventoryEvent::ItemDeleted { .. } => "inventory.item.deleted",
            InventoryEvent::ItemCategoryChanged { .. } => "inventory.item.category_changed",
            InventoryEvent::ItemUncategorized { .. } => "inventory.item.uncategorized",
            InventoryEvent::CategoryAdded { .. } => "inventory.category.added",
            InventoryEvent::CategoryRenamed { .. } => "inventory.category.renamed",
            InventoryEvent::CategoryDeleted { .. } => "inventory.category.deleted",
            InventoryEvent::ItemPlaced { .. } => "inventory.item.placed",
            InventoryEvent::ItemUnplaced { .. } => "inventory.item.unplaced",
            InventoryEvent::DrawersReplaced { .. } => "inventory.drawers.replaced",
            InventoryEvent::Restored { .. } => "inventory.restored",
        }
    }
}
