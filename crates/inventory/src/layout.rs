//! Layout engine: placing items into drawer slots.
//!
//! Two invariants are maintained here:
//!
//! - **Slot exclusivity**: no two items share a `(drawer, r, c)`. Placing into
//!   an occupied slot evicts the occupant instead of failing.
//! - **Valid references**: every placement points at an existing drawer and
//!   an in-bounds slot. Replacing the drawer set unplaces whatever no longer
//!   fits (reconciliation).
//!
//! Functions here only *plan*: they read the current items and drawers and
//! return the events that the store then applies.

use std::collections::HashSet;

use toolbox_core::{DomainError, DomainResult, DrawerId, ItemId, find_by_id};

use crate::command::{InventoryEvent, UnplaceReason};
use crate::model::{Drawer, Item, SlotPosition};

/// The drawer that owns `pos`, provided the slot is in bounds.
pub fn drawer_for<'a>(drawers: &'a [Drawer], pos: &SlotPosition) -> Option<&'a Drawer> {
    find_by_id(drawers, &pos.drawer_id).filter(|d| d.contains(pos))
}

/// Reject positions that do not address an existing, in-bounds slot.
pub fn check_slot(drawers: &[Drawer], pos: &SlotPosition) -> DomainResult<()> {
    let Some(drawer) = find_by_id(drawers, &pos.drawer_id) else {
        return Err(DomainError::validation(format!("unknown drawer {}", pos.drawer_id)));
    };
    if !drawer.contains(pos) {
        return Err(DomainError::validation(format!(
            "slot ({}, {}) is outside drawer {} ({}x{})",
            pos.r, pos.c, drawer.id, drawer.rows, drawer.cols
        )));
    }
    Ok(())
}

/// Item currently occupying `pos`.
pub fn occupant<'a>(items: &'a [Item], pos: &SlotPosition) -> Option<&'a Item> {
    items.iter().find(|i| i.is_placed_at(pos))
}

/// Plan moving `item_id` to `target` (or clearing it when `target` is `None`).
///
/// Placing an item where it already is yields no events. Any other occupant
/// of the target slot is evicted first. An item not yet in `items` (being
/// created in the same command) counts as unplaced.
pub fn plan_placement(
    items: &[Item],
    item_id: &ItemId,
    target: Option<&SlotPosition>,
) -> Vec<InventoryEvent> {
    let current = find_by_id(items, item_id).and_then(|i| i.pos.clone());

    let Some(target) = target else {
        return current
            .map(|from| InventoryEvent::ItemUnplaced {
                item_id: item_id.clone(),
                from,
                reason: UnplaceReason::Cleared,
            })
            .into_iter()
            .collect();
    };

    if current.as_ref() == Some(target) {
        return Vec::new();
    }

    let mut events: Vec<InventoryEvent> = items
        .iter()
        .filter(|i| i.id != *item_id && i.is_placed_at(target))
        .map(|i| InventoryEvent::ItemUnplaced {
            item_id: i.id.clone(),
            from: target.clone(),
            reason: UnplaceReason::Evicted { by: item_id.clone() },
        })
        .collect();

    events.push(InventoryEvent::ItemPlaced {
        item_id: item_id.clone(),
        pos: target.clone(),
        from: current,
    });
    events
}

/// Largest row or column count a drawer may have.
pub const MAX_DRAWER_SIDE: u32 = 256;

/// Validate a drawer set before it replaces the current one.
pub fn validate_drawers(drawers: &[Drawer]) -> DomainResult<()> {
    let mut seen: HashSet<&DrawerId> = HashSet::new();
    for drawer in drawers {
        if drawer.id.as_str().trim().is_empty() {
            return Err(DomainError::invalid_id("drawer id is empty"));
        }
        if !seen.insert(&drawer.id) {
            return Err(DomainError::validation(format!("duplicate drawer id {}", drawer.id)));
        }
        if drawer.name.trim().is_empty() {
            return Err(DomainError::validation(format!("drawer {} needs a name", drawer.id)));
        }
        if drawer.rows == 0 || drawer.cols == 0 {
            return Err(DomainError::validation(format!(
                "drawer {} must have at least one row and one column",
                drawer.id
            )));
        }
        if drawer.rows > MAX_DRAWER_SIDE || drawer.cols > MAX_DRAWER_SIDE {
            return Err(DomainError::validation(format!(
                "drawer {} is {}x{}; at most {MAX_DRAWER_SIDE} rows and columns are allowed",
                drawer.id, drawer.rows, drawer.cols
            )));
        }
    }
    Ok(())
}

/// Plan the placements cleared by switching to `drawers`.
///
/// Items whose slot survives are untouched.
pub fn reconcile(items: &[Item], drawers: &[Drawer]) -> Vec<InventoryEvent> {
    items
        .iter()
        .filter_map(|item| {
            let pos = item.pos.as_ref()?;
            if drawer_for(drawers, pos).is_some() {
                return None;
            }
            Some(InventoryEvent::ItemUnplaced {
                item_id: item.id.clone(),
                from: pos.clone(),
                reason: UnplaceReason::Reconciled,
            })
        })
        .collect()
}

/// Repair placements of freshly loaded items in place.
///
/// Clears placements outside `drawers`, and for slots claimed more than once
/// keeps the first claimant in collection order. Returns how many placements
/// were cleared.
pub fn repair_placements(items: &mut [Item], drawers: &[Drawer]) -> usize {
    let mut taken: HashSet<SlotPosition> = HashSet::new();
    let mut cleared = 0;

    for item in items.iter_mut() {
        let Some(pos) = item.pos.take() else {
            continue;
        };
        if drawer_for(drawers, &pos).is_none() {
            tracing::warn!(
                item_id = %item.id,
                slot = %pos,
                "dropping placement outside the drawer layout"
            );
            cleared += 1;
            continue;
        }
        if !taken.insert(pos.clone()) {
            tracing::warn!(
                item_id = %item.id,
                slot = %pos,
                "dropping duplicate claim on an occupied slot"
            );
            cleared += 1;
            continue;
        }
        item.pos = Some(pos);
    }

    cleared
}

/// The drawer to show: `requested` when it exists, else the first drawer.
pub fn active_drawer<'a>(
    drawers: &'a [Drawer],
    requested: Option<&DrawerId>,
) -> Option<&'a Drawer> {
    requested
        .and_then(|id| find_by_id(drawers, id))
        .or_else(|| drawers.first())
}

/// Row-major view of one drawer's slots and their occupants.
#[derive(Debug, Clone)]
pub struct DrawerGrid<'a> {
    drawer: &'a Drawer,
    cells: Vec<Option<&'a Item>>,
}

impl<'a> DrawerGrid<'a> {
    pub fn new(drawer: &'a Drawer, items: &'a [Item]) -> Self {
        let mut cells = vec![None; drawer.slot_count()];
        for item in items {
            if let Some(pos) = &item.pos {
                if drawer.contains(pos) {
                    cells[pos.r as usize * drawer.cols as usize + pos.c as usize] = Some(item);
                }
            }
        }
        Self { drawer, cells }
    }

    pub fn drawer(&self) -> &'a Drawer {
        self.drawer
    }

    /// Occupant of `(r, c)`; `None` for empty or out-of-bounds slots.
    pub fn get(&self, r: u32, c: u32) -> Option<&'a Item> {
        if r >= self.drawer.rows || c >= self.drawer.cols {
            return None;
        }
        self.cells[r as usize * self.drawer.cols as usize + c as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<&'a Item>]> {
        self.cells.chunks(self.drawer.cols.max(1) as usize)
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Empty slots in row-major order.
    pub fn free_slots(&self) -> impl Iterator<Item = SlotPosition> + '_ {
        self.drawer
            .slots()
            .zip(self.cells.iter())
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
    }
}
