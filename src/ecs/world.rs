//! World wrapper around hecs
//!
//! The world owns the maze grid, the player entity and every guard entity.
//! Guards never read each other, so they are stepped in plain query order.

use glam::Vec2;
use hecs::Entity;

use super::Name;
use crate::ai::{Guard, Transition};
use crate::core::{EventQueue, GameEvent};
use crate::maze::TileGrid;
use crate::player::{MoveInput, Player};

/// Game world containing the maze and all entities
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
    grid: TileGrid,
    player: Option<Entity>,
    /// Whether the player stood on a goal tile last frame
    on_goal: bool,
}

impl World {
    /// Create a world with no entities over `grid`
    pub fn new(grid: TileGrid) -> Self {
        Self {
            inner: hecs::World::new(),
            grid,
            player: None,
            on_goal: false,
        }
    }

    /// The maze this world is played on
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Spawn the player, replacing any previous one
    pub fn spawn_player(&mut self, player: Player) -> Entity {
        if let Some(old) = self.player.take() {
            let _ = self.inner.despawn(old);
        }
        let entity = self.inner.spawn((Name::new("player"), player));
        self.player = Some(entity);
        self.on_goal = false;
        entity
    }

    /// Spawn a guard
    pub fn spawn_guard(&mut self, name: impl Into<String>, guard: Guard) -> Entity {
        self.inner.spawn((Name::new(name), guard))
    }

    /// Player entity, if spawned
    pub fn player_entity(&self) -> Option<Entity> {
        self.player
    }

    /// Copy of the player's current state
    pub fn player(&self) -> Option<Player> {
        let entity = self.player?;
        self.inner.get::<&Player>(entity).ok().map(|player| *player)
    }

    /// Get a mutable reference to the player
    pub fn player_mut(&mut self) -> Option<hecs::RefMut<'_, Player>> {
        let entity = self.player?;
        self.inner.get::<&mut Player>(entity).ok()
    }

    /// Get a guard by entity
    pub fn guard(&self, entity: Entity) -> Result<hecs::Ref<'_, Guard>, hecs::ComponentError> {
        self.inner.get::<&Guard>(entity)
    }

    /// Get a mutable guard by entity
    pub fn guard_mut(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, Guard>, hecs::ComponentError> {
        self.inner.get::<&mut Guard>(entity)
    }

    /// Guard entities in stepping order
    pub fn guard_entities(&self) -> Vec<Entity> {
        self.inner
            .query::<&Guard>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Number of guards
    pub fn guard_count(&self) -> usize {
        self.inner.query::<&Guard>().iter().count()
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        if self.player == Some(entity) {
            self.player = None;
        }
        self.inner.despawn(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Clear all entities from the world
    pub fn clear(&mut self) {
        self.inner.clear();
        self.player = None;
        self.on_goal = false;
    }

    /// Run one simulation frame and record what happened in `events`.
    ///
    /// Order: player first, then every guard against the player's new
    /// position.
    pub fn step(&mut self, input: MoveInput, dt: f32, events: &mut EventQueue) {
        let Some(player_entity) = self.player else {
            return;
        };
        let grid = &self.grid;

        let player = {
            let Ok(mut player) = self.inner.get::<&mut Player>(player_entity) else {
                return;
            };
            player.step(input, dt, grid);
            *player
        };

        let center = player.body.center();
        let on_goal = grid.is_goal_at_pixel(center.x, center.y);
        if on_goal && !self.on_goal {
            log::info!("Player reached the goal");
            events.push(GameEvent::GoalReached {
                player: player_entity,
            });
        }
        self.on_goal = on_goal;

        for (entity, guard) in self.inner.query_mut::<&mut Guard>() {
            let step = guard.step(&player, grid, dt);

            match step.transition {
                Transition::Spotted => {
                    log::debug!("{entity:?} spotted the player");
                    events.push(GameEvent::PlayerSpotted {
                        guard: entity,
                        position: center,
                    });
                }
                Transition::Lost => {
                    log::debug!("{entity:?} lost the player");
                    events.push(GameEvent::PlayerLost {
                        guard: entity,
                        resume_toward: guard.patrol().target_point(),
                    });
                }
                Transition::None => {}
            }

            if let Some(toward) = step.turned_toward {
                events.push(GameEvent::PatrolTurned {
                    guard: entity,
                    toward,
                });
            }

            if guard.body.overlaps(&player.body) {
                events.push(GameEvent::PlayerCaught {
                    guard: entity,
                    position: guard.position(),
                });
            }
        }
    }

    /// Positions and facings of all guards, for renderers
    pub fn guard_poses(&self) -> Vec<(Entity, Vec2, Vec2)> {
        self.inner
            .query::<&Guard>()
            .iter()
            .map(|(entity, guard)| (entity, guard.position(), guard.facing()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GuardConfig;

    fn open_world() -> World {
        World::new(TileGrid::new(&[[0u8; 12]; 12], 32.0).unwrap())
    }

    #[test]
    fn test_spawn_player_replaces_previous() {
        let mut world = open_world();
        let first = world.spawn_player(Player::new(Vec2::new(40.0, 40.0), 14.0, 180.0));
        let second = world.spawn_player(Player::new(Vec2::new(80.0, 80.0), 14.0, 180.0));

        assert!(!world.inner.contains(first));
        assert_eq!(world.player_entity(), Some(second));
        assert_eq!(world.player().map(|p| p.position()), Some(Vec2::new(80.0, 80.0)));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_step_without_player_is_noop() {
        let mut world = open_world();
        world.spawn_guard("g", Guard::new(Vec2::new(40.0, 40.0), &GuardConfig::default()));
        let mut events = EventQueue::new();
        world.step(MoveInput::new(1, 0), 0.1, &mut events);
        assert_eq!(events.pending_count(), 0);
    }

    #[test]
    fn test_step_emits_spotted_and_caught() {
        let mut world = open_world();
        world.spawn_player(Player::new(Vec2::new(113.0, 96.0), 14.0, 180.0));
        let guard = world.spawn_guard("g", Guard::new(Vec2::new(100.0, 100.0), &GuardConfig::default()));

        let mut events = EventQueue::new();
        world.step(MoveInput::NONE, 0.1, &mut events);
        events.swap();

        assert!(events.iter().any(
            |event| matches!(event, GameEvent::PlayerSpotted { guard: g, .. } if *g == guard)
        ));
        assert!(events.iter().any(
            |event| matches!(event, GameEvent::PlayerCaught { guard: g, .. } if *g == guard)
        ));
        assert!(world.guard(guard).unwrap().is_chasing());
    }

    #[test]
    fn test_goal_event_fires_once_on_entry() {
        let mut rows = vec![vec![0u8; 6]; 6];
        rows[1][2] = 2;
        let mut world = World::new(TileGrid::new(&rows, 32.0).unwrap());
        // Center starts in tile (1, 1), one step right lands on the goal
        world.spawn_player(Player::new(Vec2::new(50.0, 40.0), 14.0, 100.0));

        let mut events = EventQueue::new();
        world.step(MoveInput::new(1, 0), 0.1, &mut events);
        world.step(MoveInput::NONE, 0.1, &mut events);
        events.swap();

        let goals = events
            .iter()
            .filter(|event| matches!(event, GameEvent::GoalReached { .. }))
            .count();
        assert_eq!(goals, 1);
    }

    #[test]
    fn test_step_emits_lost_and_turned() {
        let mut world = open_world();
        world.spawn_player(Player::new(Vec2::new(160.0, 120.0), 14.0, 180.0));
        let end_a = Vec2::new(40.0, 100.0);
        let end_b = Vec2::new(300.0, 100.0);
        let guard = world.spawn_guard(
            "g",
            Guard::new(Vec2::new(100.0, 100.0), &GuardConfig::default()).with_patrol(end_a, end_b),
        );

        let mut seen = Vec::new();
        let mut events = EventQueue::new();
        let mut run = |world: &mut World, frames: usize, seen: &mut Vec<GameEvent>| {
            for _ in 0..frames {
                world.step(MoveInput::NONE, 0.1, &mut events);
                events.swap();
                seen.extend(events.iter().cloned());
            }
        };

        run(&mut world, 1, &mut seen);
        assert!(world.guard(guard).unwrap().is_chasing());

        // Out of range behind the guard, then long enough to walk back to A
        world.player_mut().unwrap().body.position = Vec2::new(10.0, 300.0);
        run(&mut world, 30, &mut seen);

        assert!(seen.iter().any(|event| matches!(
            event,
            GameEvent::PlayerLost { guard: g, resume_toward: Some(point) }
                if *g == guard && *point == end_a
        )));
        assert!(seen.iter().any(|event| matches!(
            event,
            GameEvent::PatrolTurned { guard: g, toward } if *g == guard && *toward == end_b
        )));
        assert!(!world.guard(guard).unwrap().is_chasing());
    }

    #[test]
    fn test_guard_poses() {
        let mut world = open_world();
        let mut guard = Guard::new(Vec2::new(40.0, 60.0), &GuardConfig::default());
        guard.set_facing(Vec2::NEG_Y);
        let entity = world.spawn_guard("g", guard);
        world.spawn_player(Player::new(Vec2::new(200.0, 200.0), 14.0, 180.0));

        assert_eq!(
            world.guard_poses(),
            vec![(entity, Vec2::new(40.0, 60.0), Vec2::NEG_Y)]
        );
    }

    #[test]
    fn test_despawn_player_clears_handle() {
        let mut world = open_world();
        let player = world.spawn_player(Player::new(Vec2::new(40.0, 40.0), 14.0, 180.0));
        world.despawn(player).unwrap();
        assert!(world.player().is_none());
        assert!(world.is_empty());
    }
}
