//! Per-frame simulation step
//!
//! Order within a frame is fixed: movement, then arena clamping, then a full
//! quadtree rebuild, then overlap resolution against the quadtree candidates.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Collide, check_bounds, check_collisions};
use super::entity::{Entity, EntityId, SpriteSpec};
use super::movement::{HeldAxes, resolve_movement};
use super::quadtree::{Collidable, Quadtree};
use super::rect::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Input for a single frame, one held-axes snapshot per player slot
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub players: [HeldAxes; MAX_PLAYERS],
}

impl FrameInput {
    /// Input with only `index` holding anything
    pub fn single(index: u8, held: HeldAxes) -> Self {
        let mut input = Self::default();
        if let Some(slot) = input.players.get_mut(index as usize) {
            *slot = held;
        }
        input
    }

    pub fn for_player(&self, index: u8) -> HeldAxes {
        self.players.get(index as usize).copied().unwrap_or_default()
    }
}

/// Entity placement in the quadtree
///
/// The footprint only decides which node the id lands in. Overlap resolution
/// looks up the entity's current footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracked {
    pub id: EntityId,
    pub footprint: Rect,
}

impl Collidable for Tracked {
    fn footprint(&self) -> Rect {
        self.footprint
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Entities clamped by the arena and which edges they hit
    pub bounds_hits: Vec<(EntityId, Collide)>,
    /// Overlaps found across all movers
    pub overlaps: usize,
    /// Quadtree size after the rebuild
    pub quadtree_nodes: usize,
}

/// Arena, entities and the collision index
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Rect,
    /// Sorted by id
    pub entities: Vec<Entity>,
    /// Max speed given to newly spawned players
    pub player_speed: f32,
    quadtree: Quadtree<Tracked>,
    next_id: EntityId,
}

impl World {
    pub fn new(arena: Rect) -> Self {
        log::info!("world created with arena {:?}", arena);
        Self {
            arena,
            entities: Vec::new(),
            player_speed: PLAYER_SPEED,
            quadtree: Quadtree::new(arena),
            next_id: 1,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut world = Self::new(settings.arena);
        world.player_speed = settings.player_speed;
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_player(&mut self, index: u8, position: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let mut player = Entity::player(id, index, position, None);
        player.movement.max_speed = self.player_speed;
        self.entities.push(player);
        id
    }

    pub fn spawn_moveable(&mut self, position: Vec2, spec: SpriteSpec, movement_speed: f32) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::moveable(id, position, spec, movement_speed));
        id
    }

    pub fn spawn_obstacle(&mut self, footprint: Rect, height: i32) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::obstacle(id, footprint, height));
        id
    }

    /// Add an entity built elsewhere, replacing its id with a fresh one
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        entity.id = self.next_entity_id();
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &mut self.entities[i])
    }

    /// Drive a non-player mover; speed is split into per-axis magnitudes
    ///
    /// Returns false for unknown ids and for entities that never move.
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> bool {
        let Some(entity) = self.get_mut(id).filter(|e| e.is_movable()) else {
            return false;
        };
        let axis = |v: f32| {
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        };
        entity.movement.direction = Vec2::new(axis(velocity.x), axis(velocity.y));
        entity.movement.speed = velocity.abs();
        true
    }

    /// Quadtree as of the last frame (for debug overlays)
    pub fn quadtree(&self) -> &Quadtree<Tracked> {
        &self.quadtree
    }

    /// Place `count` obstacles at seeded random spots that overlap nothing
    ///
    /// Gives up on a slot after a bounded number of attempts, so fewer than
    /// `count` may be placed in a crowded arena. Returns the ids placed.
    pub fn scatter_obstacles(&mut self, seed: u64, count: usize) -> Vec<EntityId> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut placed = Vec::with_capacity(count);

        for _ in 0..count {
            for _ in 0..SCATTER_ATTEMPTS {
                let width = rng.random_range(OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE);
                let height = rng.random_range(OBSTACLE_MIN_SIZE..=OBSTACLE_MAX_SIZE);
                if width > self.arena.width || height > self.arena.height {
                    continue;
                }
                let x = rng.random_range(self.arena.left()..=self.arena.right() - width);
                let y = rng.random_range(self.arena.top()..=self.arena.bottom() - height);
                let footprint = Rect::new(x, y, width, height);

                if self.entities.iter().any(|e| e.footprint().intersects(&footprint)) {
                    continue;
                }
                let visual_height = rng.random_range(0..=OBSTACLE_MAX_SIZE / 2);
                placed.push(self.spawn_obstacle(footprint, visual_height));
                break;
            }
        }

        log::debug!("scattered {}/{} obstacles (seed {})", placed.len(), count, seed);
        placed
    }

    /// Clear and repopulate the quadtree from current footprints
    pub fn rebuild_quadtree(&mut self) {
        self.quadtree.clear();
        self.quadtree.insert_all(
            self.entities
                .iter()
                .filter(|e| e.is_collidable())
                .map(|e| Tracked {
                    id: e.id,
                    footprint: e.footprint(),
                }),
        );
    }
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &FrameInput, dt: f32) -> FrameReport {
    let mut report = FrameReport::default();

    // Movement
    for entity in world.entities.iter_mut().filter(|e| e.is_movable()) {
        if let Some(index) = entity.player_index() {
            let held = input.for_player(index);
            resolve_movement(&mut entity.movement, &mut entity.facing, entity.state, &held);
        }
        entity.integrate(dt);
        entity.update_animation(dt);
    }

    // Arena, for every mover including dead ones still drifting
    let arena = world.arena;
    for entity in world.entities.iter_mut().filter(|e| e.is_movable()) {
        let hit = check_bounds(entity, arena);
        if !hit.is_empty() {
            report.bounds_hits.push((entity.id, hit));
        }
    }

    world.rebuild_quadtree();
    report.quadtree_nodes = world.quadtree.node_count();

    // Overlaps, against footprints as earlier movers left them
    for i in 0..world.entities.len() {
        let mover = &world.entities[i];
        if !(mover.is_movable() && mover.is_collidable()) {
            continue;
        }
        let id = mover.id;
        let obstacles: Vec<Rect> = world
            .quadtree
            .candidates_for(mover)
            .into_iter()
            .filter(|c| c.id != id)
            .filter_map(|c| world.get(c.id))
            .map(|e| e.footprint())
            .collect();
        let overlaps = check_collisions(&mut world.entities[i], obstacles);
        if overlaps > 0 {
            log::trace!("entity {} resolved {} overlaps", id, overlaps);
        }
        report.overlaps += overlaps;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::movement::Face;

    const DT: f32 = 1.0 / 60.0;

    fn arena_world() -> World {
        World::new(Rect::new(0, 0, 800, 600))
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut world = arena_world();
        let a = world.spawn_player(0, Vec2::ZERO);
        let b = world.spawn_obstacle(Rect::new(100, 100, 20, 20), 10);
        assert_eq!((a, b), (1, 2));
        assert!(world.get(b).is_some());
        assert!(world.get(99).is_none());
    }

    #[test]
    fn test_spawn_assigns_fresh_id() {
        let mut world = arena_world();
        world.spawn_player(0, Vec2::ZERO);
        let id = world.spawn(Entity::sprite(42, Vec2::new(200.0, 200.0), SpriteSpec::default()));
        assert_eq!(id, 2);

        tick(&mut world, &FrameInput::default(), DT);
        let sprite = world.get(id).unwrap();
        assert!(!sprite.is_movable());
        assert_eq!(sprite.position(), Vec2::new(200.0, 200.0));
        assert_eq!(world.quadtree().len(), 2);
    }

    #[test]
    fn test_world_from_settings() {
        let settings = Settings {
            arena: Rect::new(0, 0, 320, 240),
            player_speed: 50.0,
            ..Default::default()
        };
        let mut world = World::from_settings(&settings);
        let id = world.spawn_player(0, Vec2::new(10.0, 10.0));

        assert_eq!(world.quadtree().bounds(), Rect::new(0, 0, 320, 240));
        tick(&mut world, &FrameInput::single(0, HeldAxes::only(Face::Right)), 1.0);
        assert_eq!(world.get(id).unwrap().position(), Vec2::new(60.0, 10.0));
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut world = arena_world();
        let id = world.spawn_player(0, Vec2::new(100.0, 100.0));

        let input = FrameInput::single(0, HeldAxes::only(Face::Right));
        tick(&mut world, &input, 0.5);

        let player = world.get(id).unwrap();
        assert_eq!(player.position(), Vec2::new(200.0, 100.0));
        assert_eq!(player.facing, Face::Right);
    }

    #[test]
    fn test_input_routed_by_player_index() {
        let mut world = arena_world();
        let p0 = world.spawn_player(0, Vec2::new(100.0, 100.0));
        let p1 = world.spawn_player(1, Vec2::new(300.0, 100.0));

        let input = FrameInput::single(1, HeldAxes::only(Face::Down));
        tick(&mut world, &input, 0.25);

        assert_eq!(world.get(p0).unwrap().position(), Vec2::new(100.0, 100.0));
        assert_eq!(world.get(p1).unwrap().position(), Vec2::new(300.0, 150.0));
    }

    #[test]
    fn test_arena_clamp_reported() {
        let mut world = arena_world();
        let id = world.spawn_player(0, Vec2::new(5.0, 100.0));

        let input = FrameInput::single(0, HeldAxes::only(Face::Left));
        let report = tick(&mut world, &input, 0.5);

        assert_eq!(report.bounds_hits, vec![(id, Collide::LEFT)]);
        assert_eq!(world.get(id).unwrap().footprint().left(), 0);
    }

    #[test]
    fn test_player_stopped_by_obstacle() {
        let mut world = arena_world();
        let id = world.spawn_player(0, Vec2::new(100.0, 100.0));
        // Player footprint is (100, 168, 40, 32); wall just to the right
        world.spawn_obstacle(Rect::new(145, 150, 20, 80), 20);

        let input = FrameInput::single(0, HeldAxes::only(Face::Right));
        let mut overlaps = 0;
        for _ in 0..30 {
            overlaps += tick(&mut world, &input, DT).overlaps;
        }

        let player = world.get(id).unwrap();
        assert!(overlaps > 0);
        assert_eq!(player.footprint().right(), 145);
    }

    #[test]
    fn test_dead_player_ignored() {
        let mut world = arena_world();
        let id = world.spawn_player(0, Vec2::new(100.0, 100.0));
        world.get_mut(id).unwrap().state = crate::sim::EntityState::Dead;

        let input = FrameInput::single(0, HeldAxes::only(Face::Right));
        tick(&mut world, &input, 0.5);
        assert_eq!(world.get(id).unwrap().position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_moveable_uses_own_velocity() {
        let mut world = arena_world();
        let id = world.spawn_moveable(Vec2::new(10.0, 10.0), SpriteSpec::default(), MOVEABLE_SPEED);
        assert!(world.set_velocity(id, Vec2::new(40.0, -40.0)));
        assert!(!world.set_velocity(999, Vec2::X));

        let report = tick(&mut world, &FrameInput::default(), 0.5);
        let mover = world.get(id).unwrap();
        // y would be -10, clamped at the arena top
        assert_eq!(mover.position(), Vec2::new(30.0, 0.0));
        assert_eq!(report.bounds_hits, vec![(id, Collide::TOP)]);
        assert_eq!(mover.movement.velocity(), Vec2::new(40.0, -40.0));
    }

    #[test]
    fn test_second_mover_sees_first_mover_pushed() {
        let mut world = arena_world();
        // Footprints (100, 168, 40, 32) and (130, 168, 40, 32) overlap by 10
        let a = world.spawn_player(0, Vec2::new(100.0, 100.0));
        let b = world.spawn_player(1, Vec2::new(130.0, 100.0));

        let report = tick(&mut world, &FrameInput::default(), DT);

        let fa = world.get(a).unwrap().footprint();
        let fb = world.get(b).unwrap().footprint();
        assert_eq!(fa.left(), 90);
        assert_eq!(fb.left(), 130);
        assert_eq!(fa.right(), fb.left());
        assert_eq!(report.overlaps, 1);
    }

    #[test]
    fn test_dead_moveable_still_clamped() {
        let mut world = arena_world();
        let id = world.spawn_moveable(Vec2::new(10.0, 10.0), SpriteSpec::default(), MOVEABLE_SPEED);
        world.get_mut(id).unwrap().state = crate::sim::EntityState::Dead;
        assert!(world.set_velocity(id, Vec2::new(-100.0, 0.0)));

        let report = tick(&mut world, &FrameInput::default(), 1.0);

        assert_eq!(world.get(id).unwrap().footprint().left(), 0);
        assert_eq!(report.bounds_hits, vec![(id, Collide::LEFT)]);
    }

    #[test]
    fn test_set_velocity_rejects_static_entities() {
        let mut world = arena_world();
        let wall = world.spawn_obstacle(Rect::new(100, 100, 20, 20), 10);
        let sprite = world.spawn(Entity::sprite(0, Vec2::new(300.0, 300.0), SpriteSpec::default()));

        assert!(!world.set_velocity(wall, Vec2::X));
        assert!(!world.set_velocity(sprite, Vec2::X));
        assert_eq!(world.get(wall).unwrap().movement.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_quadtree_rebuilt_each_frame() {
        let mut world = arena_world();
        world.spawn_player(0, Vec2::new(100.0, 100.0));
        world.scatter_obstacles(7, 20);

        tick(&mut world, &FrameInput::default(), DT);
        let first = world.quadtree().len();
        tick(&mut world, &FrameInput::default(), DT);
        assert_eq!(world.quadtree().len(), first);
        assert_eq!(first, world.entities.len());
    }

    #[test]
    fn test_scatter_is_deterministic_and_disjoint() {
        let mut a = arena_world();
        let mut b = arena_world();
        a.scatter_obstacles(42, 15);
        b.scatter_obstacles(42, 15);

        let fa: Vec<Rect> = a.entities.iter().map(|e| e.footprint()).collect();
        let fb: Vec<Rect> = b.entities.iter().map(|e| e.footprint()).collect();
        assert_eq!(fa, fb);

        for (i, r) in fa.iter().enumerate() {
            assert!(a.arena.contains(r));
            for other in &fa[i + 1..] {
                assert!(!r.intersects(other));
            }
        }
    }
}
