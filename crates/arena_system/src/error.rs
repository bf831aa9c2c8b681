//! Tick errors.

use arena_component::EcsError;

/// A tick was aborted.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A system returned an error. Systems after it did not run and the
    /// deferred-destruction queue was not flushed.
    #[error("system '{name}' failed: {source}")]
    System {
        /// Name of the failing system.
        name: String,
        /// The contract violation the system reported.
        #[source]
        source: EcsError,
    },
}
