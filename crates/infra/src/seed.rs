//! Default dataset used when no snapshot has been saved yet.

use toolbox_core::{CategoryId, IdGenerator};
use toolbox_inventory::{Category, Drawer, Inventory, Item};

/// The four-drawer layout, also the fallback for documents without drawers.
pub fn default_drawers() -> Vec<Drawer> {
    vec![
        Drawer::new("d1", "Top Tray", 3, 6),
        Drawer::new("d2", "Drawer 1", 3, 6),
        Drawer::new("d3", "Drawer 2", 4, 8),
        Drawer::new("d4", "Drawer 3", 2, 5),
    ]
}

pub fn default_categories() -> Vec<Category> {
    ["Drivers", "Sockets", "Soldering", "Measuring"]
        .into_iter()
        .zip(1..)
        .map(|(name, order)| Category {
            id: CategoryId::new(format!("c{order}")),
            name: name.to_string(),
            order,
        })
        .collect()
}

struct SampleItem {
    name: &'static str,
    category: &'static str,
    quantity: u32,
    location: &'static str,
    tags: &'static [&'static str],
    notes: &'static str,
    favorite: bool,
}

const SAMPLE_ITEMS: &[SampleItem] = &[
    SampleItem {
        name: "Phillips #2 Screwdriver",
        category: "c1",
        quantity: 2,
        location: "Tray 1",
        tags: &["driver", "#2", "phillips"],
        notes: "Primary",
        favorite: false,
    },
    SampleItem {
        name: "Flathead 5mm",
        category: "c1",
        quantity: 1,
        location: "Tray 1",
        tags: &["driver", "flat"],
        notes: "",
        favorite: false,
    },
    SampleItem {
        name: "1/2\" Socket 10mm",
        category: "c2",
        quantity: 1,
        location: "Rail A",
        tags: &["socket", "10mm", "1/2"],
        notes: "",
        favorite: true,
    },
    SampleItem {
        name: "Hakko FX-888D Iron",
        category: "c3",
        quantity: 1,
        location: "Bin S1",
        tags: &["solder", "iron"],
        notes: "",
        favorite: false,
    },
    SampleItem {
        name: "Fluke 87V DMM",
        category: "c4",
        quantity: 1,
        location: "Case",
        tags: &["meter", "dmm"],
        notes: "Calibrated 2025-06",
        favorite: false,
    },
];

/// Five unplaced sample tools, one id drawn from `ids` per item.
pub fn sample_items<G: IdGenerator>(ids: &mut G) -> Vec<Item> {
    SAMPLE_ITEMS
        .iter()
        .map(|s| Item {
            id: ids.next_item_id(),
            name: s.name.to_string(),
            category_id: Some(CategoryId::new(s.category)),
            quantity: s.quantity,
            location: s.location.to_string(),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            notes: s.notes.to_string(),
            favorite: s.favorite,
            pos: None,
        })
        .collect()
}

pub fn sample_inventory<G: IdGenerator>(ids: &mut G) -> Inventory {
    Inventory::hydrate(default_categories(), sample_items(ids), default_drawers())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbox_core::SequentialIdGenerator;

    #[test]
    fn sample_references_only_known_categories() {
        let inventory = sample_inventory(&mut SequentialIdGenerator::new("s"));
        assert_eq!(inventory.items().len(), 5);
        for item in inventory.items() {
            let category = item.category_id.as_ref().and_then(|c| inventory.category(c));
            assert!(category.is_some(), "{} has no category", item.name);
            assert!(item.pos.is_none());
        }
    }

    #[test]
    fn categories_are_ordered_one_to_four() {
        let orders: Vec<i64> = default_categories().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert_eq!(default_categories()[3].id.as_str(), "c4");
    }

    #[test]
    fn item_ids_come_from_the_generator() {
        let items = sample_items(&mut SequentialIdGenerator::new("tool-"));
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tool-1", "tool-2", "tool-3", "tool-4", "tool-5"]);
    }
}
