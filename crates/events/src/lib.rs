//! Change notification for the toolbox inventory.
//!
//! Domain crates describe what happened as [`Event`]s; the boundary layer fans
//! them out to observers (persistence hooks, views, tests) through an
//! [`EventBus`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
