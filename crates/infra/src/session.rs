//! A running toolbox: the inventory store wired to a snapshot store and an
//! event bus.
//!
//! ```text
//! command → InventoryStore → SnapshotStore::save → EventBus::publish
//! ```
//!
//! A rejected command stops at the first step: nothing is saved or published.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;

use toolbox_core::{CategoryId, DomainError, DomainResult, DrawerId, IdGenerator, ItemId};
use toolbox_events::{Event, EventBus, Subscription};
use toolbox_inventory::{
    Drawer, DrawerGrid, Inventory, InventoryEvent, InventoryStore, Item, ItemDraft, QueryCriteria,
    SlotPosition, layout, query,
};

use crate::seed;
use crate::snapshot::{SnapshotDocument, SnapshotError, SnapshotStore, export_file, import_file};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("event publish failed: {0}")]
    Publish(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

pub struct ToolboxSession<S, B, G> {
    store: InventoryStore<G>,
    snapshots: S,
    bus: B,
}

impl<S, B, G> ToolboxSession<S, B, G>
where
    S: SnapshotStore,
    B: EventBus<InventoryEvent>,
    G: IdGenerator,
{
    /// Hydrate from the last saved snapshot, or start from the sample dataset
    /// (which is saved right away).
    pub fn open(snapshots: S, bus: B, mut ids: G) -> SessionResult<Self> {
        let (inventory, seeded) = match snapshots.load()? {
            Some(document) => (document.into_inventory(), false),
            None => (seed::sample_inventory(&mut ids), true),
        };

        let session = Self {
            store: InventoryStore::with_inventory(inventory, ids),
            snapshots,
            bus,
        };
        if seeded {
            session.save()?;
        }

        tracing::info!(
            seeded,
            items = session.store.items().len(),
            categories = session.store.categories().len(),
            drawers = session.store.drawers().len(),
            "toolbox session opened"
        );
        Ok(session)
    }

    pub fn inventory(&self) -> &Inventory {
        self.store.inventory()
    }

    /// Items matching `criteria`, in display order.
    pub fn query(&self, criteria: &QueryCriteria) -> Vec<&Item> {
        query(self.store.items(), criteria)
    }

    /// The drawer to show: `requested` if it exists, else the first drawer.
    pub fn active_drawer(&self, requested: Option<&DrawerId>) -> Option<&Drawer> {
        layout::active_drawer(self.store.drawers(), requested)
    }

    pub fn grid(&self, requested: Option<&DrawerId>) -> Option<DrawerGrid<'_>> {
        self.active_drawer(requested)
            .map(|drawer| DrawerGrid::new(drawer, self.store.items()))
    }

    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.bus.subscribe()
    }

    pub fn upsert_item(
        &mut self,
        draft: ItemDraft,
    ) -> SessionResult<(ItemId, Vec<InventoryEvent>)> {
        self.run(|store| store.upsert_item(draft))
    }

    pub fn delete_item(&mut self, item_id: &ItemId) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.delete_item(item_id))
    }

    pub fn set_item_category(
        &mut self,
        item_id: &ItemId,
        category_id: Option<CategoryId>,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.set_item_category(item_id, category_id))
    }

    pub fn add_category(&mut self, name: &str) -> SessionResult<(CategoryId, Vec<InventoryEvent>)> {
        self.run(|store| store.add_category(name))
    }

    pub fn rename_category(
        &mut self,
        category_id: &CategoryId,
        name: &str,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.rename_category(category_id, name))
    }

    pub fn delete_category(
        &mut self,
        category_id: &CategoryId,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.delete_category(category_id))
    }

    pub fn place_item(
        &mut self,
        item_id: &ItemId,
        pos: Option<SlotPosition>,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.place_item(item_id, pos))
    }

    pub fn request_placement(
        &mut self,
        item_id: &ItemId,
        drawer_id: &DrawerId,
        r: u32,
        c: u32,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.request_placement(item_id, drawer_id, r, c))
    }

    pub fn replace_drawers(&mut self, drawers: Vec<Drawer>) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.replace_drawers(drawers))
    }

    pub fn add_drawer(
        &mut self,
        name: &str,
        rows: u32,
        cols: u32,
    ) -> SessionResult<(DrawerId, Vec<InventoryEvent>)> {
        self.run(|store| store.add_drawer(name, rows, cols))
    }

    pub fn rename_drawer(
        &mut self,
        drawer_id: &DrawerId,
        name: &str,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.rename_drawer(drawer_id, name))
    }

    pub fn resize_drawer(
        &mut self,
        drawer_id: &DrawerId,
        rows: u32,
        cols: u32,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.resize_drawer(drawer_id, rows, cols))
    }

    pub fn remove_drawer(&mut self, drawer_id: &DrawerId) -> SessionResult<Vec<InventoryEvent>> {
        self.run_events(|store| store.remove_drawer(drawer_id))
    }

    /// Replace the whole state with the document at `path`.
    ///
    /// On failure the current state is untouched and the error is returned.
    pub async fn import(&mut self, path: impl AsRef<Path>) -> SessionResult<Vec<InventoryEvent>> {
        let path = path.as_ref();
        let document = match import_file(path).await {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "import failed");
                return Err(err.into());
            }
        };
        let (categories, items, drawers) = document.into_parts();
        self.run_events(|store| store.restore(categories, items, drawers))
    }

    /// Write the current state, stamped now, to `path`.
    pub async fn export(&self, path: impl AsRef<Path>) -> SessionResult<SnapshotDocument> {
        let document = SnapshotDocument::capture(self.store.inventory(), Utc::now());
        export_file(path, &document).await?;
        Ok(document)
    }

    fn save(&self) -> SessionResult<()> {
        let document = SnapshotDocument::capture(self.store.inventory(), Utc::now());
        self.snapshots.save(&document)?;
        Ok(())
    }

    /// Execute one store command, persist the result, then publish it.
    ///
    /// When the save fails the in-memory state is rolled back and nothing is
    /// published.
    fn run<T>(
        &mut self,
        command: impl FnOnce(&mut InventoryStore<G>) -> DomainResult<(T, Vec<InventoryEvent>)>,
    ) -> SessionResult<(T, Vec<InventoryEvent>)> {
        let before = self.store.inventory().clone();
        let (value, events) = command(&mut self.store)?;
        if events.is_empty() {
            return Ok((value, events));
        }

        if let Err(err) = self.save() {
            tracing::warn!(error = %err, "snapshot save failed; rolling back");
            self.store.replace_inventory(before);
            return Err(err);
        }

        for event in &events {
            if event.is_reconciliation() {
                tracing::debug!(event = ?event, "placement reconciled");
            }
            tracing::trace!(event_type = event.event_type(), "publishing");
            self.bus
                .publish(event.clone())
                .map_err(|err| SessionError::Publish(format!("{err:?}")))?;
        }
        Ok((value, events))
    }

    fn run_events(
        &mut self,
        command: impl FnOnce(&mut InventoryStore<G>) -> DomainResult<Vec<InventoryEvent>>,
    ) -> SessionResult<Vec<InventoryEvent>> {
        self.run(|store| command(store).map(|events| ((), events)))
            .map(|((), events)| events)
    }
}
