//! # arena_component
//!
//! The "E" and "C" in ECS: entity identity, typed component storage and the
//! index that answers multi-type queries.
//!
//! This crate provides:
//!
//! - [`Entity`]: generation-counted entity handles.
//! - [`EntityStore`]: allocation, liveness and the deferred-destroy queue.
//! - [`Component`]: the contract all ECS data must satisfy.
//! - [`ComponentTable`]: per-type sparse-set storage.
//! - [`ComponentIndex`]: per-type entity sets and their intersection.
//! - [`QueryDescriptor`]: declarative component signatures for systems.
//! - [`World`]: the explicitly owned container for all of the above.
//! - [`Resources`] and [`Events`]: typed singletons and per-tick event queues.

pub mod component;
pub mod entity;
pub mod error;
pub mod index;
pub mod query;
pub mod resource;
pub mod storage;
pub mod world;

pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityStore};
pub use error::EcsError;
pub use index::ComponentIndex;
pub use query::{QueryDescriptor, QueryFilter};
pub use resource::{Events, Resources};
pub use storage::ComponentTable;
pub use world::World;
