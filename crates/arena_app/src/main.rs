//! # arena_app: headless soak runner
//!
//! Spawns a seeded random population of circle colliders inside a walled
//! arena and runs the simulation for a fixed number of ticks, logging
//! collision statistics along the way. Bodies that have taken too many hits
//! are destroyed and replaced, so entity churn goes through the deferred
//! destruction path every tick.
//!
//! ```text
//! arena_app [config.json]
//! ```
//!
//! The optional JSON file holds a simulation config plus a `soak` section.
//! Log output is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use arena_app::{Simulation, SimulationConfig};
use arena_collision::{Collider, CollisionEvents, CollisionLayer, LayerMask};
use arena_component::{Component, EcsError, World};
use arena_math::{Aabb, Mass, Transform2D, Vec2, Velocity};
use arena_system::{priority, system_fn};

/// Soak parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SoakConfig {
    /// Ticks to run.
    ticks: u64,
    /// Bodies kept alive at all times.
    bodies: usize,
    /// Side length of the square arena.
    arena_size: f32,
    /// RNG seed.
    seed: u64,
    /// Contacts a body survives before it is replaced.
    hits_to_destroy: u32,
    /// Ticks between progress reports.
    report_every: u64,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            bodies: 200,
            arena_size: 1000.0,
            seed: 7,
            hits_to_destroy: 5,
            report_every: 60,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunnerConfig {
    #[serde(flatten)]
    simulation: SimulationConfig,
    soak: SoakConfig,
}

/// Contacts taken so far.
#[derive(Debug, Default)]
struct Hits(u32);

impl Component for Hits {
    fn type_name() -> &'static str {
        "Hits"
    }
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arena_app=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config: RunnerConfig =
                serde_json::from_str(&json).with_context(|| format!("parsing config {path}"))?;
            config.simulation.validate()?;
            config
        }
        None => RunnerConfig::default(),
    };
    let soak = config.soak.clone();
    anyhow::ensure!(
        soak.arena_size >= 100.0,
        "soak.arena_size must be at least 100, got {}",
        soak.arena_size
    );

    // Keep bodies inside the walls even if one tunnels through.
    let mut simulation = config.simulation;
    if simulation.movement.bounds.is_none() {
        simulation.movement.bounds = Some(Aabb::new(Vec2::ZERO, Vec2::splat(soak.arena_size)));
    }

    info!(
        ticks = soak.ticks,
        bodies = soak.bodies,
        seed = soak.seed,
        "arena soak starting"
    );

    let mut sim = Simulation::new(simulation)?;
    let mut rng = StdRng::seed_from_u64(soak.seed);
    spawn_walls(sim.world_mut(), soak.arena_size)?;
    for _ in 0..soak.bodies {
        spawn_body(sim.world_mut(), &mut rng, soak.arena_size)?;
    }

    // Count hits on every body an event touches; destroy the worn out ones.
    let hits_to_destroy = soak.hits_to_destroy;
    sim.register_system(
        system_fn("damage", move |world: &mut World, _dt| {
            let touched: Vec<_> = world
                .resource::<CollisionEvents>()
                .map(|events| {
                    events
                        .iter()
                        .filter(|ev| !ev.trigger)
                        .flat_map(|ev| [ev.a, ev.b])
                        .collect()
                })
                .unwrap_or_default();
            for entity in touched {
                let Some(hits) = world.get_mut::<Hits>(entity) else {
                    continue;
                };
                hits.0 += 1;
                if hits.0 >= hits_to_destroy && !world.is_pending_destroy(entity) {
                    world.destroy(entity)?;
                }
            }
            Ok(())
        }),
        priority::DAMAGE,
    );

    // Keep the population steady.
    let target = soak.bodies;
    let arena_size = soak.arena_size;
    let mut respawn_rng = StdRng::seed_from_u64(soak.seed.wrapping_add(1));
    sim.register_system(
        system_fn("respawn", move |world: &mut World, _dt| {
            let alive = world
                .table::<Hits>()
                .map_or(0, |hits| {
                    hits.iter()
                        .filter(|(e, _)| !world.is_pending_destroy(*e))
                        .count()
                });
            for _ in alive..target {
                spawn_body(world, &mut respawn_rng, arena_size)?;
            }
            Ok(())
        }),
        priority::WAVE,
    );

    let mut total_contacts = 0usize;
    let mut total_flushed = 0usize;
    for _ in 0..soak.ticks {
        let summary = sim.step()?;
        let stats = sim.collision_stats();
        total_contacts += stats.contacts;
        total_flushed += summary.flushed;

        debug!(
            tick = sim.tick_id(),
            contacts = stats.contacts,
            flushed = summary.flushed,
            "soak tick"
        );
        if soak.report_every > 0 && sim.tick_id() % soak.report_every == 0 {
            info!(
                tick = sim.tick_id(),
                entities = sim.world().entity_count(),
                collidables = stats.collidables,
                candidate_pairs = stats.candidate_pairs,
                narrow_tests = stats.narrow_tests,
                contacts = stats.contacts,
                "soak progress"
            );
        }
    }

    info!(
        ticks = sim.tick_id(),
        entities = sim.world().entity_count(),
        total_contacts,
        total_flushed,
        "arena soak complete"
    );
    sim.shutdown();
    Ok(())
}

/// Four static walls just outside `[0, size]²`.
fn spawn_walls(world: &mut World, size: f32) -> Result<(), EcsError> {
    let half = size * 0.5;
    let thickness = 10.0;
    let walls = [
        (Vec2::new(half, -thickness), Vec2::new(half + thickness, thickness)),
        (Vec2::new(half, size + thickness), Vec2::new(half + thickness, thickness)),
        (Vec2::new(-thickness, half), Vec2::new(thickness, half + thickness)),
        (Vec2::new(size + thickness, half), Vec2::new(thickness, half + thickness)),
    ];
    for (center, half_extents) in walls {
        let wall = world.create();
        world.add(wall, Transform2D::from_position(center))?;
        world.add(
            wall,
            Collider::aabb(half_extents)
                .with_layer(CollisionLayer::OBSTACLE)
                .as_static(),
        )?;
    }
    Ok(())
}

fn spawn_body(world: &mut World, rng: &mut StdRng, size: f32) -> Result<(), EcsError> {
    let radius = rng.gen_range(4.0..12.0);
    let position = Vec2::new(
        rng.gen_range(radius..size - radius),
        rng.gen_range(radius..size - radius),
    );
    let heading = rng.gen_range(0.0..std::f32::consts::TAU);
    let speed = rng.gen_range(20.0..120.0);

    let body = world.create();
    world.add(body, Transform2D::from_position(position))?;
    world.add(body, Velocity::linear(Vec2::from_angle(heading) * speed))?;
    world.add(body, Mass(radius * radius))?;
    world.add(
        body,
        Collider::circle(radius)
            .with_layer(CollisionLayer::ENEMY)
            .with_mask(LayerMask::from_layers(&[
                CollisionLayer::ENEMY,
                CollisionLayer::OBSTACLE,
            ])),
    )?;
    world.add(body, Hits::default())?;
    Ok(())
}
