//! The system contract.

use arena_component::{EcsError, World};

/// Standard priority bands. Lower values run earlier in a tick.
pub mod priority {
    /// Input polling.
    pub const INPUT: i32 = 0;
    /// Decision making.
    pub const AI: i32 = 100;
    /// Movement integration.
    pub const PHYSICS: i32 = 200;
    /// Weapon firing and projectile spawning.
    pub const WEAPON: i32 = 300;
    /// Broad and narrow phase collision.
    pub const COLLISION: i32 = 400;
    /// Damage resolution from collision events.
    pub const DAMAGE: i32 = 500;
    /// Health bookkeeping and death marking.
    pub const HEALTH: i32 = 600;
    /// Wave spawning.
    pub const WAVE: i32 = 700;
    /// Timed status effects.
    pub const STATUS_EFFECT: i32 = 800;
    /// Lifetime expiry and other cleanup.
    pub const CLEANUP: i32 = 900;
    /// Presentation. Runs last.
    pub const RENDER: i32 = 1000;
}

/// One unit of per-tick behaviour.
///
/// Systems see a live world: entities created or components added by an
/// earlier system in the same tick are visible to later ones. Entities
/// destroyed during the tick stay alive until the scheduler flushes them
/// after the last system has run.
///
/// Lifecycle, as driven by the [`Scheduler`](crate::Scheduler):
/// [`initialize`](System::initialize) once on registration,
/// [`update`](System::update) every tick while enabled,
/// [`end_tick`](System::end_tick) after the last update of each tick, and
/// [`cleanup`](System::cleanup) on removal or shutdown.
pub trait System: 'static {
    /// Name used for logging and for addressing the system in the scheduler.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Priority used by [`Scheduler::add_system`](crate::Scheduler::add_system).
    fn priority(&self) -> i32 {
        priority::PHYSICS
    }

    /// Advance this system by `dt` seconds.
    ///
    /// Returning an error aborts the current tick.
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError>;

    /// Called once when the system is registered.
    fn initialize(&mut self) {}

    /// Called for every enabled system once all updates of a tick are done,
    /// or the tick was aborted, and before destroyed entities are flushed.
    ///
    /// Per-tick data such as event queues is discarded here.
    fn end_tick(&mut self, _world: &mut World) {}

    /// Called when the system is removed or the scheduler shuts down.
    fn cleanup(&mut self) {}
}

/// A [`System`] backed by a closure.
pub struct FnSystem<F> {
    name: &'static str,
    priority: i32,
    func: F,
}

impl<F> FnSystem<F> {
    /// Override the priority reported by [`System::priority`].
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut World, f32) -> Result<(), EcsError> + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        (self.func)(world, dt)
    }
}

/// Wrap a closure as a named system at the default priority.
#[must_use]
pub fn system_fn<F>(name: &'static str, func: F) -> FnSystem<F>
where
    F: FnMut(&mut World, f32) -> Result<(), EcsError> + 'static,
{
    FnSystem {
        name,
        priority: priority::PHYSICS,
        func,
    }
}
