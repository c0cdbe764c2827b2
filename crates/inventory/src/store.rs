//! Inventory store: the authoritative categories, items and drawers.
//!
//! [`Inventory`] is the state value. It implements [`Aggregate`]: `handle`
//! validates a command and decides its events without touching state, `apply`
//! evolves the state from one event. A rejected command therefore leaves the
//! inventory exactly as it was.
//!
//! [`InventoryStore`] is the single owner that threads the inventory through
//! every command and resolves fresh ids through the injected generator.

use std::collections::HashSet;

use toolbox_core::{
    Aggregate, CategoryId, DomainError, DomainResult, DrawerId, IdGenerator, ItemId, find_by_id,
    position_of,
};

use crate::command::{InventoryCommand, InventoryEvent, ItemDraft, parse_tags};
use crate::layout;
use crate::model::{Category, Drawer, Item, SlotPosition};

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    categories: Vec<Category>,
    items: Vec<Item>,
    drawers: Vec<Drawer>,
    version: u64,
}

/// Equality of contents; the version counter is not part of it.
impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.categories == other.categories
            && self.items == other.items
            && self.drawers == other.drawers
    }
}

impl Eq for Inventory {}

impl Inventory {
    /// Build an inventory from loaded data.
    ///
    /// Placements that break slot exclusivity or point outside `drawers` are
    /// cleared; category references are kept as loaded.
    pub fn hydrate(categories: Vec<Category>, items: Vec<Item>, drawers: Vec<Drawer>) -> Self {
        let mut inventory = Self::default();
        let events = inventory.decide_restore(categories, items, drawers);
        for event in &events {
            inventory.apply(event);
        }
        inventory
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Drawers in canonical display order.
    pub fn drawers(&self) -> &[Drawer] {
        &self.drawers
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        find_by_id(&self.items, id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn drawer(&self, id: &DrawerId) -> Option<&Drawer> {
        find_by_id(&self.drawers, id)
    }

    /// Item occupying `pos`, if any.
    pub fn occupant(&self, pos: &SlotPosition) -> Option<&Item> {
        layout::occupant(&self.items, pos)
    }

    fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == *id)
    }

    fn require_item(&self, id: &ItemId) -> DomainResult<&Item> {
        self.item(id).ok_or_else(|| DomainError::not_found(format!("item {id}")))
    }

    fn require_category(&self, id: &CategoryId) -> DomainResult<&Category> {
        self.category(id)
            .ok_or_else(|| DomainError::not_found(format!("category {id}")))
    }

    fn check_category_ref(&self, id: Option<&CategoryId>) -> DomainResult<()> {
        match id {
            Some(id) if self.category(id).is_none() => {
                Err(DomainError::validation(format!("unknown category {id}")))
            }
            _ => Ok(()),
        }
    }

    fn decide_upsert(
        &self,
        item_id: &ItemId,
        draft: &ItemDraft,
    ) -> DomainResult<Vec<InventoryEvent>> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("item name is required"));
        }

        let existing = self.item(item_id);
        if existing.is_none() && draft.category_id.is_none() {
            return Err(DomainError::validation("a category is required for new items"));
        }
        // An item may keep a category reference that no longer resolves.
        let unchanged = existing.is_some_and(|e| e.category_id == draft.category_id);
        if !unchanged {
            self.check_category_ref(draft.category_id.as_ref())?;
        }
        if let Some(pos) = &draft.pos {
            layout::check_slot(&self.drawers, pos)?;
        }

        let item = Item {
            id: item_id.clone(),
            name: name.to_string(),
            category_id: draft.category_id.clone(),
            quantity: normalize_quantity(draft.quantity),
            location: draft.location.trim().to_string(),
            tags: parse_tags(&draft.tags),
            notes: draft.notes.trim().to_string(),
            favorite: draft.favorite,
            pos: existing.and_then(|e| e.pos.clone()),
        };

        let mut events = vec![match existing {
            Some(_) => InventoryEvent::ItemUpdated { item },
            None => InventoryEvent::ItemCreated { item },
        }];
        if let Some(pos) = &draft.pos {
            events.extend(layout::plan_placement(&self.items, item_id, Some(pos)));
        }
        Ok(events)
    }

    fn decide_set_category(
        &self,
        item_id: &ItemId,
        category_id: Option<&CategoryId>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        let item = self.require_item(item_id)?;
        self.check_category_ref(category_id)?;
        if item.category_id.as_ref() == category_id {
            return Ok(Vec::new());
        }
        Ok(vec![InventoryEvent::ItemCategoryChanged {
            item_id: item_id.clone(),
            category_id: category_id.cloned(),
        }])
    }

    fn decide_add_category(
        &self,
        category_id: &CategoryId,
        name: &str,
    ) -> DomainResult<Vec<InventoryEvent>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name is required"));
        }
        if self.category(category_id).is_some() {
            return Err(DomainError::invariant(format!("category {category_id} already exists")));
        }
        let order = self.categories.last().map(|c| c.order).unwrap_or(0) + 1;
        Ok(vec![InventoryEvent::CategoryAdded {
            category: Category {
                id: category_id.clone(),
                name: name.to_string(),
                order,
            },
        }])
    }

    fn decide_rename_category(
        &self,
        category_id: &CategoryId,
        name: &str,
    ) -> DomainResult<Vec<InventoryEvent>> {
        let category = self.require_category(category_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name is required"));
        }
        if category.name == name {
            return Ok(Vec::new());
        }
        Ok(vec![InventoryEvent::CategoryRenamed {
            category_id: category_id.clone(),
            name: name.to_string(),
        }])
    }

    fn decide_delete_category(
        &self,
        category_id: &CategoryId,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.require_category(category_id)?;
        let mut events: Vec<InventoryEvent> = self
            .items
            .iter()
            .filter(|i| i.category_id.as_ref() == Some(category_id))
            .map(|i| InventoryEvent::ItemUncategorized {
                item_id: i.id.clone(),
                former: category_id.clone(),
            })
            .collect();
        events.push(InventoryEvent::CategoryDeleted {
            category_id: category_id.clone(),
        });
        Ok(events)
    }

    fn decide_place(
        &self,
        item_id: &ItemId,
        pos: Option<&SlotPosition>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.require_item(item_id)?;
        if let Some(pos) = pos {
            layout::check_slot(&self.drawers, pos)?;
        }
        Ok(layout::plan_placement(&self.items, item_id, pos))
    }

    fn decide_replace_drawers(&self, drawers: &[Drawer]) -> DomainResult<Vec<InventoryEvent>> {
        layout::validate_drawers(drawers)?;
        let mut events = vec![InventoryEvent::DrawersReplaced {
            drawers: drawers.to_vec(),
        }];
        events.extend(layout::reconcile(&self.items, drawers));
        Ok(events)
    }

    fn decide_restore(
        &self,
        categories: Vec<Category>,
        items: Vec<Item>,
        drawers: Vec<Drawer>,
    ) -> Vec<InventoryEvent> {
        let mut seen: HashSet<ItemId> = HashSet::new();
        let mut items: Vec<Item> = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id.clone());
                if !fresh {
                    tracing::warn!(item_id = %item.id, "dropping item with duplicate id");
                }
                fresh
            })
            .collect();

        let cleared = layout::repair_placements(&mut items, &drawers);
        if cleared > 0 {
            tracing::warn!(cleared, "cleared invalid placements while restoring");
        }

        vec![InventoryEvent::Restored {
            categories,
            items,
            drawers,
        }]
    }
}

fn normalize_quantity(quantity: Option<i64>) -> u32 {
    match quantity {
        None => 1,
        Some(q) => u32::try_from(q.max(0)).unwrap_or(u32::MAX),
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemCreated { item } => {
                self.items.push(item.clone());
            }
            InventoryEvent::ItemUpdated { item } => {
                if let Some(slot) = self.item_mut(&item.id) {
                    *slot = item.clone();
                }
            }
            InventoryEvent::ItemDeleted { item_id } => {
                self.items.retain(|i| i.id != *item_id);
            }
            InventoryEvent::ItemCategoryChanged { item_id, category_id } => {
                if let Some(item) = self.item_mut(item_id) {
                    item.category_id = category_id.clone();
                }
            }
            InventoryEvent::ItemUncategorized { item_id, .. } => {
                if let Some(item) = self.item_mut(item_id) {
                    item.category_id = None;
                }
            }
            InventoryEvent::CategoryAdded { category } => {
                self.categories.push(category.clone());
            }
            InventoryEvent::CategoryRenamed { category_id, name } => {
                if let Some(idx) = position_of(&self.categories, category_id) {
                    self.categories[idx].name = name.clone();
                }
            }
            InventoryEvent::CategoryDeleted { category_id } => {
                self.categories.retain(|c| c.id != *category_id);
            }
            InventoryEvent::ItemPlaced { item_id, pos, .. } => {
                if let Some(item) = self.item_mut(item_id) {
                    item.pos = Some(pos.clone());
                }
            }
            InventoryEvent::ItemUnplaced { item_id, .. } => {
                if let Some(item) = self.item_mut(item_id) {
                    item.pos = None;
                }
            }
            InventoryEvent::DrawersReplaced { drawers } => {
                self.drawers = drawers.clone();
            }
            InventoryEvent::Restored {
                categories,
                items,
                drawers,
            } => {
                self.categories = categories.clone();
                self.items = items.clone();
                self.drawers = drawers.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::UpsertItem { item_id, draft } => self.decide_upsert(item_id, draft),
            InventoryCommand::DeleteItem { item_id } => {
                self.require_item(item_id)?;
                Ok(vec![InventoryEvent::ItemDeleted {
                    item_id: item_id.clone(),
                }])
            }
            InventoryCommand::SetItemCategory { item_id, category_id } => {
                self.decide_set_category(item_id, category_id.as_ref())
            }
            InventoryCommand::AddCategory { category_id, name } => {
                self.decide_add_category(category_id, name)
            }
            InventoryCommand::RenameCategory { category_id, name } => {
                self.decide_rename_category(category_id, name)
            }
            InventoryCommand::DeleteCategory { category_id } => {
                self.decide_delete_category(category_id)
            }
            InventoryCommand::PlaceItem { item_id, pos } => {
                self.decide_place(item_id, pos.as_ref())
            }
            InventoryCommand::ReplaceDrawers { drawers } => self.decide_replace_drawers(drawers),
            InventoryCommand::Restore {
                categories,
                items,
                drawers,
            } => Ok(self.decide_restore(categories.clone(), items.clone(), drawers.clone())),
        }
    }
}

/// Owner of the inventory and the id generator.
#[derive(Debug, Clone)]
pub struct InventoryStore<G> {
    inventory: Inventory,
    ids: G,
}

impl<G: IdGenerator> InventoryStore<G> {
    pub fn new(ids: G) -> Self {
        Self::with_inventory(Inventory::default(), ids)
    }

    pub fn with_inventory(inventory: Inventory, ids: G) -> Self {
        Self { inventory, ids }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    /// Swap in `inventory` wholesale, returning the previous state.
    ///
    /// Used to roll back a command whose outcome could not be persisted.
    pub fn replace_inventory(&mut self, inventory: Inventory) -> Inventory {
        std::mem::replace(&mut self.inventory, inventory)
    }

    pub fn categories(&self) -> &[Category] {
        self.inventory.categories()
    }

    pub fn items(&self) -> &[Item] {
        self.inventory.items()
    }

    pub fn drawers(&self) -> &[Drawer] {
        self.inventory.drawers()
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.inventory.item(id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.inventory.category(id)
    }

    pub fn drawer(&self, id: &DrawerId) -> Option<&Drawer> {
        self.inventory.drawer(id)
    }

    /// Run one command to completion.
    pub fn execute(&mut self, command: InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        match self.inventory.execute(&command) {
            Ok(events) => {
                let reconciled = events.iter().filter(|e| e.is_reconciliation()).count();
                tracing::debug!(
                    events = events.len(),
                    reconciled,
                    version = self.inventory.version(),
                    "inventory command applied"
                );
                Ok(events)
            }
            Err(err) => {
                tracing::debug!(error = %err, "inventory command rejected");
                Err(err)
            }
        }
    }

    /// Create or update an item from a draft.
    ///
    /// A draft whose id names an existing item edits it; any other draft
    /// creates a new item under a freshly generated id.
    pub fn upsert_item(&mut self, draft: ItemDraft) -> DomainResult<(ItemId, Vec<InventoryEvent>)> {
        let item_id = match &draft.id {
            Some(id) if self.inventory.item(id).is_some() => id.clone(),
            _ => self.ids.next_item_id(),
        };
        let events = self.execute(InventoryCommand::UpsertItem {
            item_id: item_id.clone(),
            draft,
        })?;
        Ok((item_id, events))
    }

    pub fn delete_item(&mut self, item_id: &ItemId) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::DeleteItem {
            item_id: item_id.clone(),
        })
    }

    /// Move an item to another category (or none) without touching its slot.
    pub fn set_item_category(
        &mut self,
        item_id: &ItemId,
        category_id: Option<CategoryId>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::SetItemCategory {
            item_id: item_id.clone(),
            category_id,
        })
    }

    pub fn add_category(&mut self, name: &str) -> DomainResult<(CategoryId, Vec<InventoryEvent>)> {
        let category_id = self.ids.next_category_id();
        let events = self.execute(InventoryCommand::AddCategory {
            category_id: category_id.clone(),
            name: name.to_string(),
        })?;
        Ok((category_id, events))
    }

    pub fn rename_category(
        &mut self,
        category_id: &CategoryId,
        name: &str,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::RenameCategory {
            category_id: category_id.clone(),
            name: name.to_string(),
        })
    }

    /// Delete a category; its items stay, uncategorized.
    pub fn delete_category(
        &mut self,
        category_id: &CategoryId,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::DeleteCategory {
            category_id: category_id.clone(),
        })
    }

    /// Place an item into a slot (evicting any occupant) or clear it with `None`.
    pub fn place_item(
        &mut self,
        item_id: &ItemId,
        pos: Option<SlotPosition>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::PlaceItem {
            item_id: item_id.clone(),
            pos,
        })
    }

    /// Drop target of a drag: put `item_id` at `(drawer_id, r, c)`.
    pub fn request_placement(
        &mut self,
        item_id: &ItemId,
        drawer_id: &DrawerId,
        r: u32,
        c: u32,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.place_item(item_id, Some(SlotPosition::new(drawer_id.clone(), r, c)))
    }

    /// Swap in a new drawer set and unplace items that no longer fit.
    pub fn replace_drawers(&mut self, drawers: Vec<Drawer>) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::ReplaceDrawers { drawers })
    }

    /// Append a drawer under a freshly generated id.
    pub fn add_drawer(
        &mut self,
        name: &str,
        rows: u32,
        cols: u32,
    ) -> DomainResult<(DrawerId, Vec<InventoryEvent>)> {
        let drawer_id = self.ids.next_drawer_id();
        let mut drawers = self.drawers().to_vec();
        drawers.push(Drawer::new(drawer_id.clone(), name.trim(), rows, cols));
        let events = self.replace_drawers(drawers)?;
        Ok((drawer_id, events))
    }

    pub fn rename_drawer(
        &mut self,
        drawer_id: &DrawerId,
        name: &str,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.edit_drawer(drawer_id, |d| d.name = name.trim().to_string())
    }

    /// Change a drawer's grid; placements beyond the new bounds are unplaced.
    pub fn resize_drawer(
        &mut self,
        drawer_id: &DrawerId,
        rows: u32,
        cols: u32,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.edit_drawer(drawer_id, |d| {
            d.rows = rows;
            d.cols = cols;
        })
    }

    /// Remove a drawer; everything placed in it becomes unplaced.
    pub fn remove_drawer(&mut self, drawer_id: &DrawerId) -> DomainResult<Vec<InventoryEvent>> {
        if self.drawer(drawer_id).is_none() {
            return Err(DomainError::not_found(format!("drawer {drawer_id}")));
        }
        let drawers = self
            .drawers()
            .iter()
            .filter(|d| &d.id != drawer_id)
            .cloned()
            .collect();
        self.replace_drawers(drawers)
    }

    fn edit_drawer(
        &mut self,
        drawer_id: &DrawerId,
        edit: impl FnOnce(&mut Drawer),
    ) -> DomainResult<Vec<InventoryEvent>> {
        let mut drawers = self.drawers().to_vec();
        let drawer = drawers
            .iter_mut()
            .find(|d| &d.id == drawer_id)
            .ok_or_else(|| DomainError::not_found(format!("drawer {drawer_id}")))?;
        edit(drawer);
        self.replace_drawers(drawers)
    }

    /// Replace the whole state with loaded data.
    pub fn restore(
        &mut self,
        categories: Vec<Category>,
        items: Vec<Item>,
        drawers: Vec<Drawer>,
    ) -> DomainResult<Vec<InventoryEvent>> {
        self.execute(InventoryCommand::Restore {
            categories,
            items,
            drawers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::UnplaceReason;
    use proptest::prelude::*;
    use toolbox_core::SequentialIdGenerator;

    fn slot(d: &str, r: u32, c: u32) -> SlotPosition {
        SlotPosition::new(d, r, c)
    }

    fn store() -> InventoryStore<SequentialIdGenerator> {
        let mut store = InventoryStore::new(SequentialIdGenerator::new("id-"));
        store
            .restore(
                vec![
                    Category { id: "c1".into(), name: "Drivers".into(), order: 1 },
                    Category { id: "c2".into(), name: "Sockets".into(), order: 2 },
                ],
                vec![],
                vec![Drawer::new("d1", "Top Tray", 3, 6), Drawer::new("d2", "Drawer 1", 2, 2)],
            )
            .unwrap();
        store
    }

    fn add(
        store: &mut InventoryStore<SequentialIdGenerator>,
        name: &str,
        category: &str,
    ) -> ItemId {
        store.upsert_item(ItemDraft::new(name, category)).unwrap().0
    }

    fn pos_of(store: &InventoryStore<SequentialIdGenerator>, id: &ItemId) -> Option<SlotPosition> {
        store.item(id).unwrap().pos.clone()
    }

    #[test]
    fn create_normalizes_the_draft() {
        let mut store = store();
        let draft = ItemDraft::new("  Phillips #2 Screwdriver ", "c1")
            .with_location(" Tray 1 ")
            .with_tags("driver, #2 ,, phillips")
            .with_notes(" Primary\n")
            .with_favorite(true);

        let (id, events) = store.upsert_item(draft).unwrap();

        assert_eq!(id.as_str(), "id-1");
        assert!(matches!(events.as_slice(), [InventoryEvent::ItemCreated { .. }]));
        let item = store.item(&id).unwrap();
        assert_eq!(item.name, "Phillips #2 Screwdriver");
        assert_eq!(item.location, "Tray 1");
        assert_eq!(item.notes, "Primary");
        assert_eq!(item.tags, vec!["driver", "#2", "phillips"]);
        assert_eq!(item.quantity, 1);
        assert!(item.favorite);
        assert_eq!(item.pos, None);
    }

    #[test]
    fn quantity_is_clamped_to_non_negative() {
        let mut store = store();
        let (id, _) = store.upsert_item(ItemDraft::new("Shim", "c1").with_quantity(-4)).unwrap();
        assert_eq!(store.item(&id).unwrap().quantity, 0);

        let (id, _) = store.upsert_item(ItemDraft::new("Washer", "c1").with_quantity(25)).unwrap();
        assert_eq!(store.item(&id).unwrap().quantity, 25);
    }

    #[test]
    fn create_requires_name_and_category() {
        let mut store = store();
        let before = store.inventory().clone();

        let err = store.upsert_item(ItemDraft::new("   ", "c1")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let no_category = ItemDraft {
            name: "Torx T20".into(),
            ..ItemDraft::default()
        };
        assert!(matches!(store.upsert_item(no_category), Err(DomainError::Validation(_))));

        assert!(matches!(
            store.upsert_item(ItemDraft::new("Torx T20", "nope")),
            Err(DomainError::Validation(_))
        ));

        assert_eq!(store.inventory(), &before);
    }

    #[test]
    fn update_keeps_placement_unless_a_new_one_is_given() {
        let mut store = store();
        let id = add(&mut store, "Flathead 5mm", "c1");
        store.place_item(&id, Some(slot("d1", 1, 1))).unwrap();

        let draft = ItemDraft::edit(store.item(&id).unwrap()).with_quantity(3);
        let (same, events) = store.upsert_item(draft).unwrap();
        assert_eq!(same, id);
        assert!(matches!(events.as_slice(), [InventoryEvent::ItemUpdated { .. }]));
        assert_eq!(pos_of(&store, &id), Some(slot("d1", 1, 1)));
        assert_eq!(store.item(&id).unwrap().quantity, 3);

        let draft = ItemDraft::edit(store.item(&id).unwrap()).with_pos(slot("d2", 0, 1));
        store.upsert_item(draft).unwrap();
        assert_eq!(pos_of(&store, &id), Some(slot("d2", 0, 1)));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn editing_an_uncategorized_item_is_allowed() {
        let mut store = store();
        let id = add(&mut store, "Flathead 5mm", "c1");
        store.set_item_category(&id, None).unwrap();

        let draft = ItemDraft::edit(store.item(&id).unwrap()).with_notes("loose");
        store.upsert_item(draft).unwrap();
        assert_eq!(store.item(&id).unwrap().category_id, None);
        assert_eq!(store.item(&id).unwrap().notes, "loose");
    }

    #[test]
    fn unknown_draft_id_creates_a_new_item() {
        let mut store = store();
        let mut draft = ItemDraft::new("Level", "c2");
        draft.id = Some(ItemId::new("ghost"));
        let (id, events) = store.upsert_item(draft).unwrap();
        assert_eq!(id.as_str(), "id-1");
        assert!(matches!(events.as_slice(), [InventoryEvent::ItemCreated { .. }]));
    }

    #[test]
    fn creating_with_a_position_claims_the_slot() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        store.place_item(&a, Some(slot("d1", 0, 0))).unwrap();

        let (b, _) = store
            .upsert_item(ItemDraft::new("Bit set", "c1").with_pos(slot("d1", 0, 0)))
            .unwrap();

        assert_eq!(pos_of(&store, &a), None);
        assert_eq!(pos_of(&store, &b), Some(slot("d1", 0, 0)));
    }

    #[test]
    fn upsert_rejects_positions_outside_the_layout() {
        let mut store = store();
        let err = store
            .upsert_item(ItemDraft::new("Bit set", "c1").with_pos(slot("d2", 2, 0)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.items().is_empty());
    }

    #[test]
    fn delete_item_frees_its_slot() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        store.place_item(&a, Some(slot("d1", 0, 0))).unwrap();

        store.delete_item(&a).unwrap();
        assert!(store.item(&a).is_none());
        assert!(store.inventory().occupant(&slot("d1", 0, 0)).is_none());
        assert!(matches!(store.delete_item(&a), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn set_item_category_leaves_placement_alone() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        store.place_item(&a, Some(slot("d1", 0, 2))).unwrap();

        store.set_item_category(&a, Some("c2".into())).unwrap();
        let item = store.item(&a).unwrap();
        assert_eq!(item.category_id, Some(CategoryId::new("c2")));
        assert_eq!(item.pos, Some(slot("d1", 0, 2)));

        assert!(store.set_item_category(&a, Some("c2".into())).unwrap().is_empty());
        assert!(matches!(
            store.set_item_category(&a, Some("zz".into())),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            store.set_item_category(&ItemId::new("zz"), None),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn categories_are_added_after_the_last_order() {
        let mut store = store();
        let (id, _) = store.add_category("  Soldering ").unwrap();
        let category = store.category(&id).unwrap();
        assert_eq!(category.name, "Soldering");
        assert_eq!(category.order, 3);

        assert!(matches!(store.add_category(" "), Err(DomainError::Validation(_))));

        let mut empty = InventoryStore::new(SequentialIdGenerator::new("c"));
        let (id, _) = empty.add_category("First").unwrap();
        assert_eq!(empty.category(&id).unwrap().order, 1);
    }

    #[test]
    fn rename_category_in_place() {
        let mut store = store();
        store.rename_category(&"c1".into(), "Screwdrivers").unwrap();
        assert_eq!(store.categories()[0].name, "Screwdrivers");
        assert_eq!(store.categories()[0].order, 1);

        assert!(matches!(
            store.rename_category(&"c1".into(), ""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            store.rename_category(&"zz".into(), "X"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn deleting_a_category_orphans_its_items() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        let b = add(&mut store, "Bit set", "c1");
        let c = add(&mut store, "Socket", "c2");
        store.place_item(&a, Some(slot("d1", 0, 0))).unwrap();

        let events = store.delete_category(&"c1".into()).unwrap();

        assert_eq!(events.len(), 3);
        assert!(store.category(&"c1".into()).is_none());
        assert_eq!(store.items().len(), 3);
        assert!(store.items().iter().all(|i| i.category_id != Some(CategoryId::new("c1"))));
        assert_eq!(store.item(&a).unwrap().category_id, None);
        assert_eq!(store.item(&b).unwrap().category_id, None);
        assert_eq!(store.item(&c).unwrap().category_id, Some(CategoryId::new("c2")));
        assert_eq!(pos_of(&store, &a), Some(slot("d1", 0, 0)));
    }

    #[test]
    fn placing_unknown_items_or_slots_fails_without_side_effects() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        store.place_item(&a, Some(slot("d1", 0, 0))).unwrap();
        let before = store.inventory().clone();

        assert!(matches!(
            store.place_item(&ItemId::new("ghost"), Some(slot("d1", 0, 0))),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            store.place_item(&a, Some(slot("d9", 0, 0))),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(store.inventory(), &before);
    }

    #[test]
    fn eviction_scenario_and_reconciliation() {
        let mut store = InventoryStore::new(SequentialIdGenerator::new("id-"));
        store
            .restore(
                vec![Category { id: "c1".into(), name: "Drivers".into(), order: 1 }],
                vec![],
                vec![Drawer::new("d1", "d1", 1, 1)],
            )
            .unwrap();
        let x = add(&mut store, "X", "c1");
        let y = add(&mut store, "Y", "c1");

        store.request_placement(&x, &"d1".into(), 0, 0).unwrap();
        let events = store.request_placement(&y, &"d1".into(), 0, 0).unwrap();

        assert_eq!(
            events[0],
            InventoryEvent::ItemUnplaced {
                item_id: x.clone(),
                from: slot("d1", 0, 0),
                reason: UnplaceReason::Evicted { by: y.clone() },
            }
        );
        assert_eq!(pos_of(&store, &x), None);
        assert_eq!(pos_of(&store, &y), Some(slot("d1", 0, 0)));

        let events = store.replace_drawers(vec![Drawer::new("d1", "d1", 1, 1)]).unwrap();
        assert!(events.iter().all(|e| !e.is_reconciliation()));
        assert_eq!(pos_of(&store, &y), Some(slot("d1", 0, 0)));

        let events = store.replace_drawers(vec![]).unwrap();
        assert_eq!(events.iter().filter(|e| e.is_reconciliation()).count(), 1);
        assert_eq!(pos_of(&store, &y), None);
        assert!(store.drawers().is_empty());
    }

    #[test]
    fn shrinking_a_drawer_unplaces_only_out_of_bounds_items() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        let b = add(&mut store, "Bit set", "c1");
        let c = add(&mut store, "Caliper", "c1");
        store.place_item(&a, Some(slot("d1", 2, 0))).unwrap();
        store.place_item(&b, Some(slot("d1", 0, 5))).unwrap();
        store.place_item(&c, Some(slot("d2", 1, 1))).unwrap();

        store
            .replace_drawers(vec![
                Drawer::new("d2", "Drawer 1", 2, 2),
                Drawer::new("d1", "Top Tray", 2, 5),
            ])
            .unwrap();

        assert_eq!(pos_of(&store, &a), None);
        assert_eq!(pos_of(&store, &b), None);
        assert_eq!(pos_of(&store, &c), Some(slot("d2", 1, 1)));
        assert_eq!(store.drawers()[0].id.as_str(), "d2");
    }

    #[test]
    fn invalid_drawer_sets_are_rejected_without_change() {
        let mut store = store();
        let before = store.inventory().clone();
        assert!(store.replace_drawers(vec![Drawer::new("d1", "Top Tray", 0, 3)]).is_err());
        assert_eq!(store.inventory(), &before);
    }

    #[test]
    fn drawer_editing_goes_through_reconciliation() {
        let mut store = store();
        let a = add(&mut store, "Awl", "c1");
        store.place_item(&a, Some(slot("d1", 2, 5))).unwrap();

        let (d3, _) = store.add_drawer(" Bits ", 1, 4).unwrap();
        assert_eq!(d3.as_str(), "id-2");
        assert_eq!(store.drawer(&d3).unwrap().name, "Bits");

        store.rename_drawer(&"d1".into(), "Lid").unwrap();
        assert_eq!(store.drawer(&"d1".into()).unwrap().name, "Lid");
        assert_eq!(pos_of(&store, &a), Some(slot("d1", 2, 5)));

        let events = store.resize_drawer(&"d1".into(), 3, 5).unwrap();
        assert!(events.iter().any(InventoryEvent::is_reconciliation));
        assert_eq!(pos_of(&store, &a), None);

        store.place_item(&a, Some(slot("d2", 0, 0))).unwrap();
        store.remove_drawer(&"d2".into()).unwrap();
        assert_eq!(pos_of(&store, &a), None);
        assert_eq!(store.drawers().len(), 2);
    }

    #[test]
    fn drawer_editing_rejects_unknown_drawers_and_bad_sizes() {
        let mut store = store();
        assert!(matches!(
            store.remove_drawer(&"nope".into()),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            store.resize_drawer(&"nope".into(), 1, 1),
            Err(DomainError::NotFound(_))
        ));
        assert!(store.resize_drawer(&"d1".into(), 0, 2).unwrap_err().is_validation());
        assert!(store.add_drawer("  ", 2, 2).unwrap_err().is_validation());
        assert!(store.add_drawer("Huge", 100_000, 100_000).unwrap_err().is_validation());
        assert!(store.resize_drawer(&"d2".into(), 2, 100_000).unwrap_err().is_validation());
        assert_eq!(store.drawers().len(), 2);
        assert_eq!(store.drawer(&"d2".into()).map(|d| d.cols), Some(2));
    }

    #[test]
    fn items_with_a_dangling_category_stay_editable() {
        let mut store = store();
        let orphan = Item {
            id: "a".into(),
            name: "Awl".into(),
            category_id: Some("gone".into()),
            quantity: 1,
            location: String::new(),
            tags: vec![],
            notes: String::new(),
            favorite: false,
            pos: None,
        };
        let (categories, drawers) = (store.categories().to_vec(), store.drawers().to_vec());
        store.restore(categories, vec![orphan.clone()], drawers).unwrap();

        store.upsert_item(ItemDraft::edit(&orphan).with_quantity(3)).unwrap();
        let item = store.item(&orphan.id).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.category_id, Some(CategoryId::new("gone")));

        // Switching to another unknown category is still rejected.
        let mut draft = ItemDraft::edit(item);
        draft.category_id = Some("also-gone".into());
        assert!(store.upsert_item(draft).unwrap_err().is_validation());
    }

    #[test]
    fn hydrate_repairs_placements_but_keeps_dangling_categories() {
        let items = vec![
            Item {
                id: "a".into(),
                name: "Awl".into(),
                category_id: Some("deleted".into()),
                quantity: 1,
                location: String::new(),
                tags: vec![],
                notes: String::new(),
                favorite: false,
                pos: Some(slot("d1", 0, 0)),
            },
            Item {
                id: "b".into(),
                name: "Bit".into(),
                category_id: None,
                quantity: 1,
                location: String::new(),
                tags: vec![],
                notes: String::new(),
                favorite: false,
                pos: Some(slot("d1", 0, 0)),
            },
        ];
        let inventory =
            Inventory::hydrate(vec![], items, vec![Drawer::new("d1", "Top Tray", 1, 1)]);

        assert_eq!(inventory.item(&"a".into()).unwrap().pos, Some(slot("d1", 0, 0)));
        assert_eq!(inventory.item(&"b".into()).unwrap().pos, None);
        assert_eq!(
            inventory.item(&"a".into()).unwrap().category_id,
            Some(CategoryId::new("deleted"))
        );
        assert_eq!(inventory.version(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Place { item: usize, drawer: usize, r: u32, c: u32 },
        Clear { item: usize },
        Resize { drawer: usize, rows: u32, cols: u32 },
        Remove { drawer: usize },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0..6usize, 0..3usize, 0..4u32, 0..4u32)
                .prop_map(|(item, drawer, r, c)| Op::Place { item, drawer, r, c }),
            1 => (0..6usize).prop_map(|item| Op::Clear { item }),
            1 => (0..3usize, 1..4u32, 1..4u32)
                .prop_map(|(drawer, rows, cols)| Op::Resize { drawer, rows, cols }),
            1 => (0..3usize).prop_map(|drawer| Op::Remove { drawer }),
        ]
    }

    fn assert_invariants(inventory: &Inventory) {
        let mut seen = HashSet::new();
        for item in inventory.items() {
            if let Some(pos) = &item.pos {
                assert!(seen.insert(pos.clone()), "slot {pos} held twice");
                assert!(
                    layout::drawer_for(inventory.drawers(), pos).is_some(),
                    "slot {pos} dangling"
                );
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no sequence of placements and drawer edits breaks slot
        /// exclusivity or leaves a placement outside the layout.
        #[test]
        fn layout_invariants_hold(ops in proptest::collection::vec(op(), 1..60)) {
            let mut store = InventoryStore::new(SequentialIdGenerator::new("i"));
            store.restore(
                vec![Category { id: "c1".into(), name: "Drivers".into(), order: 1 }],
                vec![],
                vec![
                    Drawer::new("d0", "A", 3, 3),
                    Drawer::new("d1", "B", 2, 4),
                    Drawer::new("d2", "C", 4, 2),
                ],
            ).unwrap();
            let items: Vec<ItemId> =
                (0..6).map(|n| add(&mut store, &format!("Tool {n}"), "c1")).collect();

            for op in ops {
                let drawer_id = |n: usize| DrawerId::new(format!("d{n}"));
                match op {
                    Op::Place { item, drawer, r, c } => {
                        let before = store.inventory().clone();
                        let target = SlotPosition::new(drawer_id(drawer), r, c);
                        let prior = before.occupant(&target).map(|i| i.id.clone());
                        match store.place_item(&items[item], Some(target.clone())) {
                            Ok(_) => {
                                let placed = store.item(&items[item]).unwrap();
                                prop_assert_eq!(placed.pos.as_ref(), Some(&target));
                                if let Some(prior) = prior.filter(|p| *p != items[item]) {
                                    prop_assert_eq!(store.item(&prior).unwrap().pos.as_ref(), None);
                                }
                            }
                            Err(_) => prop_assert_eq!(store.inventory(), &before),
                        }
                    }
                    Op::Clear { item } => {
                        store.place_item(&items[item], None).unwrap();
                        prop_assert_eq!(store.item(&items[item]).unwrap().pos.as_ref(), None);
                    }
                    Op::Resize { drawer, rows, cols } => {
                        let id = drawer_id(drawer);
                        let mut drawers = store.drawers().to_vec();
                        if let Some(d) = drawers.iter_mut().find(|d| d.id == id) {
                            d.rows = rows;
                            d.cols = cols;
                        } else {
                            drawers.push(Drawer::new(id.clone(), "Re-added", rows, cols));
                        }
                        let before = store.inventory().clone();
                        store.replace_drawers(drawers).unwrap();
                        for item in before.items() {
                            let now = store.item(&item.id).unwrap();
                            match &item.pos {
                                Some(pos) if layout::drawer_for(store.drawers(), pos).is_some() => {
                                    prop_assert_eq!(now.pos.as_ref(), Some(pos));
                                }
                                _ => prop_assert_eq!(now.pos.as_ref(), None),
                            }
                        }
                    }
                    Op::Remove { drawer } => {
                        let id = drawer_id(drawer);
                        let drawers: Vec<Drawer> =
                            store.drawers().iter().filter(|d| d.id != id).cloned().collect();
                        store.replace_drawers(drawers).unwrap();
                        prop_assert!(store
                            .items()
                            .iter()
                            .all(|i| i.pos.as_ref().map(|p| &p.drawer_id) != Some(&id)));
                    }
                }
                assert_invariants(store.inventory());
            }
        }
    }
}
