//! Snapshot boundary: the whole inventory as one serialized document.
//!
//! The store never depends on this for logic. It is used to hydrate the
//! initial state and to persist every resulting state.

pub mod document;
pub mod in_memory;
pub mod json_file;
pub mod r#trait;
pub mod transfer;

pub use document::SnapshotDocument;
pub use in_memory::InMemorySnapshotStore;
pub use json_file::JsonFileSnapshotStore;
pub use r#trait::{SnapshotError, SnapshotStore};
pub use transfer::{export_file, export_file_name, import_file};
