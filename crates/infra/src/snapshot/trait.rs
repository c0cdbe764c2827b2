use std::sync::Arc;

use thiserror::Error;

use super::document::SnapshotDocument;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Malformed or structurally incomplete document.
    #[error("snapshot could not be parsed: {0}")]
    Parse(String),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("snapshot store lock poisoned")]
    Poisoned,
}

impl SnapshotError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Load/save boundary for the whole inventory.
///
/// Implementations hold at most one document: `save` replaces whatever was
/// there, `load` returns the latest saved document or `None` when nothing
/// has been saved yet (callers then start from the sample dataset).
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<SnapshotDocument>, SnapshotError>;

    fn save(&self, document: &SnapshotDocument) -> Result<(), SnapshotError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Option<SnapshotDocument>, SnapshotError> {
        (**self).load()
    }

    fn save(&self, document: &SnapshotDocument) -> Result<(), SnapshotError> {
        (**self).save(document)
    }
}
