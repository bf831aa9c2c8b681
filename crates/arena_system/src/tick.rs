//! Fixed-timestep tick loop.
//!
//! Each tick:
//!
//! 1. Runs every enabled system in priority order.
//! 2. Flushes entities destroyed during the tick.
//! 3. Advances the tick counter.
//!
//! [`TickLoop::advance`] turns variable frame times into whole fixed ticks
//! for hosts that own their own frame pacing. [`TickLoop::run`] is a
//! blocking sleep-paced loop for headless runs.

use std::time::{Duration, Instant};

use arena_component::World;
use tracing::{debug, info, warn};

use crate::config::TickConfig;
use crate::error::TickError;
use crate::scheduler::{Scheduler, TickSummary};

/// The simulation's tick loop state.
#[derive(Debug)]
pub struct TickLoop {
    /// Number of completed ticks.
    tick_id: u64,
    /// Tick configuration.
    config: TickConfig,
    /// The simulated world.
    world: World,
    /// Systems run every tick.
    scheduler: Scheduler,
    /// Real time not yet consumed by fixed steps.
    accumulator: f64,
    /// While paused, `advance` does nothing.
    paused: bool,
}

impl TickLoop {
    /// Create a tick loop with an empty world and no systems.
    #[must_use]
    pub fn new(config: TickConfig) -> Self {
        Self::with_parts(config, World::new(), Scheduler::new())
    }

    /// Create a tick loop around an existing world and scheduler.
    #[must_use]
    pub fn with_parts(config: TickConfig, world: World, scheduler: Scheduler) -> Self {
        Self {
            tick_id: 0,
            config,
            world,
            scheduler,
            accumulator: 0.0,
            paused: false,
        }
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the tick configuration.
    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns a reference to the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns a mutable reference to the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Split the loop back into its world and scheduler.
    #[must_use]
    pub fn into_parts(self) -> (World, Scheduler) {
        (self.world, self.scheduler)
    }

    /// Stop [`advance`](Self::advance) from running ticks.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`pause`](Self::pause). Time that passed while paused is
    /// not replayed.
    pub fn resume(&mut self) {
        self.paused = false;
        self.accumulator = 0.0;
    }

    /// Returns `true` while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run one tick of `dt` seconds.
    ///
    /// The tick counter only advances when every system succeeded.
    pub fn tick(&mut self, dt: f64) -> Result<TickSummary, TickError> {
        debug!(tick_id = self.tick_id + 1, dt, "tick start");

        let summary = self.scheduler.tick(&mut self.world, dt as f32)?;
        self.tick_id += 1;

        debug!(
            tick_id = self.tick_id,
            systems = summary.systems_run,
            flushed = summary.flushed,
            entities = self.world.entity_count(),
            "tick end"
        );
        Ok(summary)
    }

    /// Run one tick of the configured fixed length.
    pub fn step(&mut self) -> Result<TickSummary, TickError> {
        self.tick(self.config.fixed_dt())
    }

    /// Feed `frame_time` seconds of real time and run as many whole fixed
    /// ticks as fit, up to `max_steps_per_frame`.
    ///
    /// Leftover time below one tick carries over to the next call. If the
    /// step limit is reached, the rest of the backlog is dropped. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, frame_time: f64) -> Result<u32, TickError> {
        if self.paused {
            return Ok(0);
        }

        let fixed_dt = self.config.fixed_dt();
        self.accumulator += frame_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= fixed_dt && steps < self.config.max_steps_per_frame {
            self.tick(fixed_dt)?;
            self.accumulator -= fixed_dt;
            steps += 1;
        }

        if self.accumulator >= fixed_dt {
            warn!(
                tick_id = self.tick_id,
                steps,
                dropped_ms = (self.accumulator * 1000.0) as u64,
                "frame step limit reached, dropping backlog"
            );
            self.accumulator = 0.0;
        }

        Ok(steps)
    }

    /// Run the tick loop for the configured number of ticks, or indefinitely.
    ///
    /// Blocks the calling thread, sleeping between ticks to hold the
    /// configured rate. Stops at the first tick error.
    pub fn run(&mut self) -> Result<(), TickError> {
        let tick_duration = Duration::from_secs_f64(self.config.fixed_dt());
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            systems = self.scheduler.len(),
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.tick(tick_duration.as_secs_f64())?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::system::system_fn;

    fn quarter_second_loop(max_steps_per_frame: u32) -> TickLoop {
        TickLoop::new(TickConfig {
            tick_rate: 4.0,
            max_ticks: 0,
            max_steps_per_frame,
        })
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut tick_loop = TickLoop::new(TickConfig::default());
        assert_eq!(tick_loop.tick_id(), 0);
        tick_loop.tick(1.0 / 60.0).unwrap();
        assert_eq!(tick_loop.tick_id(), 1);
        tick_loop.step().unwrap();
        assert_eq!(tick_loop.tick_id(), 2);
    }

    #[test]
    fn test_systems_receive_dt() {
        let seen = Rc::new(Cell::new(0.0f32));
        let mut tick_loop = quarter_second_loop(5);
        let sink = Rc::clone(&seen);
        tick_loop.scheduler_mut().add_system(system_fn("dt", move |_: &mut World, dt| {
            sink.set(dt);
            Ok(())
        }));

        tick_loop.step().unwrap();
        assert_eq!(seen.get(), 0.25);
    }

    #[test]
    fn test_advance_accumulates_remainder() {
        let mut tick_loop = quarter_second_loop(5);
        assert_eq!(tick_loop.advance(0.625).unwrap(), 2);
        assert_eq!(tick_loop.advance(0.125).unwrap(), 1);
        assert_eq!(tick_loop.advance(0.125).unwrap(), 0);
        assert_eq!(tick_loop.tick_id(), 3);
    }

    #[test]
    fn test_advance_clamps_and_drops_backlog() {
        let mut tick_loop = quarter_second_loop(3);
        assert_eq!(tick_loop.advance(10.0).unwrap(), 3);
        // The backlog is gone, so a small frame runs nothing.
        assert_eq!(tick_loop.advance(0.125).unwrap(), 0);
        assert_eq!(tick_loop.tick_id(), 3);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut tick_loop = quarter_second_loop(5);
        tick_loop.pause();
        assert!(tick_loop.is_paused());
        assert_eq!(tick_loop.advance(1.0).unwrap(), 0);
        assert_eq!(tick_loop.tick_id(), 0);

        tick_loop.resume();
        assert_eq!(tick_loop.advance(0.25).unwrap(), 1);
        assert_eq!(tick_loop.tick_id(), 1);
    }

    #[test]
    fn test_run_limited_ticks() {
        let config = TickConfig {
            tick_rate: 1000.0, // fast for testing
            max_ticks: 5,
            max_steps_per_frame: 5,
        };
        let mut tick_loop = TickLoop::new(config);
        tick_loop.run().unwrap();
        assert_eq!(tick_loop.tick_id(), 5);
    }
}
