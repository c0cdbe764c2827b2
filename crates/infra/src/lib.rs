//! Infrastructure layer: snapshot persistence, import/export, configuration,
//! the built-in sample dataset, and the session that ties the inventory
//! store to them.

pub mod config;
pub mod seed;
pub mod session;
pub mod snapshot;


pub use config::{ConfigError, ToolboxConfig};
pub use session::{SessionError, ToolboxSession};
pub use snapshot::{
    InMemorySnapshotStore, JsonFileSnapshotStore, SnapshotDocument, SnapshotError, SnapshotStore,
};
