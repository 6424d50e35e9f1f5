//! This module contains the main game logic and state.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::{schedule::Schedule, world::World};
use strum::IntoEnumIterator;
use tracing::{error, info};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::events::{AudioEvent, GameCommand, GameEvent};
use crate::formatter;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::level::LevelCatalog;
use crate::map::parser::StartPositions;
use crate::systems::{
    animation_system, cell_center, eaten_ghost_revert_system, ghost_movement_system, ghost_target_system,
    player_control_system, player_movement_system, power_up_timer_system, snapshot_system, stage_command_system,
    stage_timer_system, AnimationCounter, CurrentLevel, FrameSnapshot, GameStage, Ghost, GhostBundle, GhostState,
    GlobalState, Path, PlayerBundle, PlayerControlled, Position, PowerUp, RequestedDirection, Session, Target, Velocity,
};

/// The `Game` struct is the main entry point for the simulation.
///
/// It owns the ECS world and the fixed, ordered schedule that advances it one frame per [`Game::tick`].
/// Input goes in through [`Game::send`]; the renderer reads [`Game::snapshot`] and the audio
/// collaborator drains [`Game::drain_audio`].
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    frame: u64,
}

impl Game {
    /// Starts a new game on the first built-in level.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        Self::with_catalog(config, LevelCatalog::builtin()?)
    }

    /// Starts a new game on the first level of `catalog`.
    pub fn with_catalog(config: GameConfig, catalog: LevelCatalog) -> GameResult<Game> {
        config.validate()?;

        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<GameError>(&mut world);
        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<AudioEvent>(&mut world);

        let level = catalog.get(0)?;
        let grid = TileGrid::from_level(level);
        let current = CurrentLevel {
            index: 0,
            color: level.color,
            starts: level.starts,
        };
        info!(level = 0, pellets = grid.dots_left(), "Level loaded");

        world.insert_resource(config);
        world.insert_resource(catalog);
        world.insert_resource(grid);
        world.insert_resource(current);
        let stage = GameStage::intro(&config);
        world.insert_resource(stage);
        world.insert_resource(Session::new(&config));
        world.insert_resource(PowerUp::default());
        world.insert_resource(AnimationCounter::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(FrameSnapshot::empty(stage));

        Self::spawn_agents(&mut world, &current.starts, &config);
        Self::configure_schedule(&mut schedule);

        world.send_event(AudioEvent::Intro);

        Ok(Game { world, schedule, frame: 0 })
    }

    fn spawn_agents(world: &mut World, starts: &StartPositions, config: &GameConfig) {
        world.spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position::from_tile(starts.player),
            velocity: Velocity {
                direction: Direction::Right,
                speed: config.player_speed,
            },
            requested: RequestedDirection(Direction::Right),
        });

        for ghost in Ghost::iter() {
            let spawn = ghost.spawn_tile(starts);
            world.spawn(GhostBundle {
                ghost,
                state: GhostState::Normal,
                position: Position::from_tile(spawn),
                velocity: Velocity {
                    direction: Direction::default(),
                    speed: config.ghost_speed,
                },
                target: Target(cell_center(spawn)),
                path: Path::default(),
            });
        }
    }

    /// The frame order is load-bearing: commands, timers, the snapshot of the previous frame,
    /// then the player (with collisions), eaten ghost revival, targeting and ghost movement.
    fn configure_schedule(schedule: &mut Schedule) {
        schedule.add_systems(
            (
                (player_control_system, stage_command_system).chain(),
                (stage_timer_system, animation_system, power_up_timer_system).chain(),
                snapshot_system,
                player_movement_system,
                eaten_ghost_revert_system,
                ghost_target_system,
                ghost_movement_system,
            )
                .chain(),
        );
    }

    /// Queues a command for the next tick.
    pub fn send(&mut self, command: GameCommand) {
        self.world.send_event(GameEvent::from(command));
    }

    /// Advances the simulation by one frame.
    ///
    /// Returns true if the game should exit.
    pub fn tick(&mut self) -> bool {
        self.frame += 1;
        formatter::set_frame(self.frame);

        self.schedule.run(&mut self.world);

        for e in self.world.resource_mut::<Events<GameError>>().drain() {
            error!(error = %e, "System error");
        }
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();

        self.world.get_resource::<GlobalState>().is_some_and(|state| state.exit)
    }

    /// The number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The view of the world taken at the start of the last tick, before anything moved.
    pub fn snapshot(&self) -> &FrameSnapshot {
        self.world.resource::<FrameSnapshot>()
    }

    /// Takes every audio cue raised since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioEvent> {
        self.world.resource_mut::<Events<AudioEvent>>().drain().collect()
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn session(&self) -> Session {
        *self.world.resource::<Session>()
    }

    pub fn grid(&self) -> &TileGrid {
        self.world.resource::<TileGrid>()
    }
}
