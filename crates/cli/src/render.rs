//! Plain-text rendering for the terminal.

use std::fmt::Write;

use toolbox_core::{DrawerId, ItemId};
use toolbox_inventory::{DrawerGrid, Inventory, InventoryEvent, Item, Placement, UnplaceReason};

fn item_name<'a>(inventory: &'a Inventory, id: &ItemId) -> &'a str {
    inventory.item(id).map(|i| i.name.as_str()).unwrap_or("(deleted item)")
}

pub fn items(inventory: &Inventory, items: &[&Item]) -> String {
    let mut out = String::new();
    for item in items {
        let category = item
            .category_id
            .as_ref()
            .and_then(|id| inventory.category(id))
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        let slot = match item.placement() {
            Placement::Placed(pos) => pos.to_string(),
            Placement::Unplaced => "unplaced".to_string(),
        };
        let star = if item.favorite { "*" } else { " " };
        let _ = writeln!(
            out,
            "{star} {}\t{}\tx{}\t{category}\t{slot}\t{}",
            item.id,
            item.name,
            item.quantity,
            item.tags.join(",")
        );
    }
    if items.is_empty() {
        out.push_str("No matching items.\n");
    }
    out
}

/// One line naming every drawer, the active one bracketed.
pub fn drawer_tabs(inventory: &Inventory, active: &DrawerId) -> String {
    let tabs: Vec<String> = inventory
        .drawers()
        .iter()
        .map(|d| {
            if &d.id == active {
                format!("[{}]", d.name)
            } else {
                d.name.clone()
            }
        })
        .collect();
    format!("{}\n", tabs.join("  "))
}

pub fn grid(grid: &DrawerGrid<'_>) -> String {
    const CELL: usize = 14;

    let drawer = grid.drawer();
    let mut out = format!(
        "{} ({}×{}, {} placed)\n",
        drawer.name,
        drawer.rows,
        drawer.cols,
        grid.occupied()
    );
    for row in grid.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                let label = cell.map(|i| i.name.as_str()).unwrap_or("·");
                let clipped: String = label.chars().take(CELL).collect();
                format!("{clipped:<width$}", width = CELL)
            })
            .collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

/// Human-readable notice for side effects a person would not expect from
/// the command they ran.
pub fn notice(inventory: &Inventory, event: &InventoryEvent) -> Option<String> {
    match event {
        InventoryEvent::ItemUnplaced {
            item_id,
            from,
            reason: UnplaceReason::Evicted { by },
        } => Some(format!(
            "{} was moved out of {from} to make room for {}",
            item_name(inventory, item_id),
            item_name(inventory, by)
        )),
        InventoryEvent::ItemUnplaced {
            item_id,
            from,
            reason: UnplaceReason::Reconciled,
        } => Some(format!(
            "{} no longer fits at {from} and was unplaced",
            item_name(inventory, item_id)
        )),
        InventoryEvent::ItemUncategorized { item_id, .. } => {
            Some(format!("{} is now uncategorized", item_name(inventory, item_id)))
        }
        _ => None,
    }
}
