//! Toolbox inventory domain.
//!
//! Categories, items and drawers, the store that keeps them consistent, the
//! layout engine that places items into drawer slots, and the query engine
//! that filters and orders items for display. Everything here is
//! deterministic domain logic (no IO, no clocks, no randomness).

pub mod command;
pub mod layout;
pub mod model;
pub mod query;
pub mod store;

pub use command::{InventoryCommand, InventoryEvent, ItemDraft, UnplaceReason, parse_tags};
pub use layout::DrawerGrid;
pub use model::{Category, Drawer, Item, Placement, SlotPosition};
pub use query::{QueryCriteria, all_tags, categories_by_order, collate, query};
pub use store::{Inventory, InventoryStore};
