//! ECS contract-violation errors.

use crate::entity::Entity;

/// Errors raised when a caller breaks an ECS contract.
///
/// These are programming errors, not runtime conditions: they are returned
/// immediately and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The operation referenced a destroyed or never-created entity.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// `destroy` was called for an entity that is not alive.
    #[error("cannot destroy unknown {0}")]
    UnknownEntity(Entity),

    /// A component of this type is already attached to the entity.
    #[error("{entity} already has a '{component}' component")]
    DuplicateComponent {
        /// The entity the component was added to.
        entity: Entity,
        /// Name of the component type.
        component: &'static str,
    },

    /// The table stored for a component type holds values of another type.
    #[error("component table for '{component}' holds another type")]
    TableTypeMismatch {
        /// Name of the requested component type.
        component: &'static str,
    },
}
