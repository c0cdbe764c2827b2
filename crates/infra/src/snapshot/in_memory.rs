use std::sync::RwLock;

use super::document::SnapshotDocument;
use super::r#trait::{SnapshotError, SnapshotStore};

/// Snapshot store kept in memory. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    document: RwLock<Option<SnapshotDocument>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `document`.
    pub fn with_document(document: SnapshotDocument) -> Self {
        Self {
            document: RwLock::new(Some(document)),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<SnapshotDocument>, SnapshotError> {
        let guard = self.document.read().map_err(|_| SnapshotError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, document: &SnapshotDocument) -> Result<(), SnapshotError> {
        let mut guard = self.document.write().map_err(|_| SnapshotError::Poisoned)?;
        *guard = Some(document.clone());
        Ok(())
    }
}
