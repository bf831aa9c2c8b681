//! Core [`Component`] trait and type identity.
//!
//! Every piece of data stored in the ECS must implement [`Component`]. The
//! core never looks inside component values; gameplay code defines the
//! fields, the world only stores and indexes them.
//!
//! ## Type Identity
//!
//! [`ComponentTypeId`] wraps the Rust [`TypeId`] of the component, so two
//! distinct types never share a table or an index slot, even when their
//! [`Component::type_name`] strings are equal. Names are only used in logs
//! and error messages.

use std::any::TypeId;

/// A unique identifier for a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(TypeId);

impl ComponentTypeId {
    /// The [`ComponentTypeId`] for a component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// The core component trait.
///
/// Components are plain data records. An entity holds at most one instance of
/// each component type.
///
/// # Examples
///
/// ```rust
/// use arena_component::Component;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Send + Sync + 'static {
    /// A human-readable name for this component type.
    ///
    /// Defaults to the fully qualified Rust type name. It does not need to be
    /// unique.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
