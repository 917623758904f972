//! Sprite Sim - headless demo
//!
//! Runs a scripted session: two players walk around a seeded obstacle field
//! while a moveable sprite bounces between the arena walls.
//!
//! Usage: `sprite-sim [settings.json]`

use glam::Vec2;

use sprite_sim::Settings;
use sprite_sim::sim::{Collidable, Face, FrameInput, HeldAxes, SpriteSpec, World, tick};

const FRAMES: u32 = 600;
const DT: f32 = 1.0 / 60.0;
const SEED: u64 = 0x5eed;

/// Scripted held input for a player: walk a square, one side per second
fn scripted_input(frame: u32, index: u8) -> HeldAxes {
    let faces = [Face::Right, Face::Down, Face::Left, Face::Up];
    let side = (frame / 60 + index as u32) as usize % faces.len();
    HeldAxes::only(faces[side])
}

fn main() {
    env_logger::init();
    log::info!("Sprite Sim (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut world = World::from_settings(&settings);
    let arena = world.arena;
    let center = arena.center();
    let players = [
        world.spawn_player(0, center - Vec2::new(150.0, 0.0)),
        world.spawn_player(1, center + Vec2::new(100.0, 0.0)),
    ];
    let bouncer = world.spawn_moveable(
        Vec2::new(arena.x as f32 + 8.0, center.y),
        SpriteSpec::default(),
        settings.moveable_speed,
    );
    world.set_velocity(bouncer, Vec2::new(settings.moveable_speed, 0.0));
    let obstacles = world.scatter_obstacles(SEED, 12);
    log::info!("Spawned {} players, {} obstacles", players.len(), obstacles.len());

    let mut overlaps = 0;
    let mut wall_hits = 0;
    for frame in 0..FRAMES {
        let mut input = FrameInput::default();
        for (slot, held) in input.players.iter_mut().enumerate().take(players.len()) {
            *held = scripted_input(frame, slot as u8);
        }

        let report = tick(&mut world, &input, DT);
        overlaps += report.overlaps;

        // Reverse the bouncer whenever the arena stops it
        if report.bounds_hits.iter().any(|(id, _)| *id == bouncer) {
            wall_hits += 1;
            if let Some(entity) = world.get(bouncer) {
                let reversed = -entity.movement.velocity();
                world.set_velocity(bouncer, reversed);
            }
        }
    }

    for id in players.iter().chain([&bouncer]) {
        if let Some(entity) = world.get(*id) {
            log::info!(
                "entity {} at {:?}, footprint {:?}, facing {:?}, depth {:.4}",
                entity.id,
                entity.position(),
                entity.footprint(),
                entity.facing,
                entity.depth(settings.viewport_height)
            );
        }
    }
    log::info!(
        "{} frames: {} overlaps resolved, bouncer hit the arena {} times, quadtree has {} nodes",
        FRAMES,
        overlaps,
        wall_hits,
        world.quadtree().node_count()
    );

    if settings.debug_footprints {
        let mut nodes = Vec::new();
        world.quadtree().node_bounds(&mut nodes);
        for bounds in nodes {
            log::info!("quadtree node {:?}", bounds);
        }
        for entity in &world.entities {
            log::info!("footprint {:?} color {:?}", entity.footprint(), entity.debug_color());
        }
    }
}
