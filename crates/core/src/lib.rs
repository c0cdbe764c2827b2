//! `toolbox-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, opaque identifiers and the injected id generator, and the
//! traits the inventory model is built on.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::Aggregate;
pub use entity::{Entity, find_by_id, position_of};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, DrawerId, IdGenerator, ItemId, RandomIdGenerator, SequentialIdGenerator};
pub use value_object::ValueObject;
