#![allow(dead_code)]

use bevy_ecs::{
    entity::Entity,
    event::{EventRegistry, Events},
    world::World,
};
use glam::IVec2;
use pacman_engine::{
    config::GameConfig,
    events::{AudioEvent, GameCommand, GameEvent},
    error::GameError,
    map::{
        direction::Direction,
        grid::TileGrid,
        level::{LevelCatalog, LevelColor},
        parser::StartPositions,
    },
    systems::{
        cell_center, AnimationCounter, CurrentLevel, FrameSnapshot, GameStage, Ghost, GhostBundle, GhostState, GlobalState,
        Path, PlayerBundle, PlayerControlled, Position, PowerUp, RequestedDirection, Session, Target, Velocity,
    },
};

/// A 9x7 board: a pellet ring around a ghost room, entered through a door at (4, 2).
///
/// ```text
/// #########
/// # ......#
/// #.##=##.#
/// #.#   #.#
/// #.#####.#
/// #...o...#
/// #########
/// ```
pub const BOX_CODES: [&[u8]; 7] = [
    &[5, 5, 5, 5, 5, 5, 5, 5, 5],
    &[5, 0, 1, 1, 1, 1, 1, 1, 5],
    &[5, 1, 5, 5, 3, 5, 5, 1, 5],
    &[5, 1, 5, 0, 0, 0, 5, 1, 5],
    &[5, 1, 5, 5, 5, 5, 5, 1, 5],
    &[5, 1, 1, 1, 2, 1, 1, 1, 5],
    &[5, 5, 5, 5, 5, 5, 5, 5, 5],
];

pub fn box_grid() -> TileGrid {
    TileGrid::from_codes(&BOX_CODES).expect("box grid should be valid")
}

/// Start markers that fit [`box_grid`].
pub fn box_starts() -> StartPositions {
    StartPositions {
        player: IVec2::new(1, 1),
        blinky: IVec2::new(3, 3),
        inky: IVec2::new(4, 3),
        pinky: IVec2::new(5, 3),
        home: IVec2::new(4, 3),
    }
}

/// A world holding every resource the systems expect, in the `Playing` stage on `grid`.
pub fn create_test_world(grid: TileGrid) -> World {
    let mut world = World::default();
    let config = GameConfig::default();

    EventRegistry::register_event::<GameError>(&mut world);
    EventRegistry::register_event::<GameEvent>(&mut world);
    EventRegistry::register_event::<AudioEvent>(&mut world);

    world.insert_resource(config);
    world.insert_resource(LevelCatalog::builtin().expect("built-in levels should load"));
    world.insert_resource(grid);
    world.insert_resource(CurrentLevel {
        index: 0,
        color: LevelColor::new(33, 33, 222),
        starts: box_starts(),
    });
    world.insert_resource(GameStage::Playing);
    world.insert_resource(Session::new(&config));
    world.insert_resource(PowerUp::default());
    world.insert_resource(AnimationCounter::default());
    world.insert_resource(GlobalState::default());
    world.insert_resource(FrameSnapshot::empty(GameStage::Playing));

    world
}

/// Spawns the player at a pixel position, heading and requesting `direction`.
pub fn spawn_player(world: &mut World, pixel: IVec2, direction: Direction, speed: u32) -> Entity {
    world
        .spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position(pixel),
            velocity: Velocity { direction, speed },
            requested: RequestedDirection(direction),
        })
        .id()
}

/// Spawns a ghost aligned on `tile`, targeting its own cell.
pub fn spawn_ghost(world: &mut World, ghost: Ghost, tile: IVec2, state: GhostState, speed: u32) -> Entity {
    world
        .spawn(GhostBundle {
            ghost,
            state,
            position: Position::from_tile(tile),
            velocity: Velocity {
                direction: Direction::Left,
                speed,
            },
            target: Target(cell_center(tile)),
            path: Path::default(),
        })
        .id()
}

pub fn send_command(world: &mut World, command: GameCommand) {
    world.send_event(GameEvent::Command(command));
}

/// Takes every audio cue written so far.
pub fn drain_audio(world: &mut World) -> Vec<AudioEvent> {
    world.resource_mut::<Events<AudioEvent>>().drain().collect()
}
