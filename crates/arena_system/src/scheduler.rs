//! System scheduler: priority ordering and the per-tick run.
//!
//! Systems are kept sorted by `(priority, registration order)`. The sort is
//! stable, so two systems with the same priority always run in the order
//! they were registered. After every enabled system has run, the scheduler
//! gives each one its end-of-tick hook and then flushes the world's
//! deferred-destruction queue exactly once.

use arena_component::World;
use tracing::{debug, info};

use crate::error::TickError;
use crate::system::System;

/// A registered system and its scheduling metadata.
struct Entry {
    name: String,
    priority: i32,
    /// Registration sequence number, the tie breaker.
    seq: u64,
    enabled: bool,
    system: Box<dyn System>,
}

/// What one scheduler tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Systems that ran (disabled systems are not counted).
    pub systems_run: usize,
    /// Entities released by the end-of-tick flush.
    pub flushed: usize,
}

/// Ordered collection of systems driving the world one tick at a time.
#[derive(Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system at an explicit priority.
    pub fn register_system<S: System>(&mut self, system: S, priority: i32) {
        self.insert(Box::new(system), priority);
    }

    /// Register a system at the priority it reports itself.
    pub fn add_system<S: System>(&mut self, system: S) {
        let priority = system.priority();
        self.insert(Box::new(system), priority);
    }

    /// Register an already boxed system.
    pub fn register_boxed(&mut self, system: Box<dyn System>, priority: i32) {
        self.insert(system, priority);
    }

    fn insert(&mut self, mut system: Box<dyn System>, priority: i32) {
        system.initialize();
        let name = system.name().to_owned();
        let seq = self.next_seq;
        self.next_seq += 1;

        info!(system = %name, priority, "registered system");

        // Insert after every entry that sorts before or alongside it; the
        // sequence number is always the largest so far.
        let pos = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(
            pos,
            Entry {
                name,
                priority,
                seq,
                enabled: true,
                system,
            },
        );
        debug_assert!(
            self.entries
                .windows(2)
                .all(|w| (w[0].priority, w[0].seq) < (w[1].priority, w[1].seq))
        );
    }

    /// Remove the first system with the given name, after running its
    /// [`cleanup`](System::cleanup) hook.
    pub fn remove_system(&mut self, name: &str) -> Option<Box<dyn System>> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        let mut entry = self.entries.remove(pos);
        entry.system.cleanup();
        info!(system = %entry.name, "removed system");
        Some(entry.system)
    }

    /// Clean up and drop every system, in execution order.
    pub fn shutdown(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.system.cleanup();
        }
        info!("scheduler shut down");
    }

    /// The first system with the given name.
    #[must_use]
    pub fn get_system(&self, name: &str) -> Option<&dyn System> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.system.as_ref())
    }

    /// The first system with the given name, mutably.
    pub fn get_system_mut(&mut self, name: &str) -> Option<&mut (dyn System + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| e.system.as_mut())
    }

    /// Enable or disable the first system with the given name.
    ///
    /// A disabled system keeps its place in the order but is skipped by
    /// [`tick`](Self::tick). Returns `false` if no system has that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.enabled = enabled;
                debug!(system = name, enabled, "system toggled");
                true
            }
            None => false,
        }
    }

    /// Whether the named system is enabled, or `None` if it is not registered.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.enabled)
    }

    /// Returns `true` if a system with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// System names in execution order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of registered systems, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every enabled system once, in order, then the end-of-tick hooks,
    /// then flush destroyed entities.
    ///
    /// The first system error aborts the tick: later systems are skipped and
    /// the flush does not happen, so entities marked for destruction stay
    /// pending until the next completed tick. End-of-tick hooks still run.
    pub fn tick(&mut self, world: &mut World, dt: f32) -> Result<TickSummary, TickError> {
        let mut systems_run = 0;
        let mut failure = None;
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            if let Err(source) = entry.system.update(world, dt) {
                failure = Some(TickError::System {
                    name: entry.name.clone(),
                    source,
                });
                break;
            }
            systems_run += 1;
        }

        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            entry.system.end_tick(world);
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let flushed = world.flush_destroyed();
        debug!(dt, systems_run, flushed, "scheduler tick complete");

        Ok(TickSummary {
            systems_run,
            flushed,
        })
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.system_names())
            .finish()
    }
}
