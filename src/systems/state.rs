use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    constants::GHOST_SCORE_BASE,
    error::{GameError, GameResult},
    events::{AudioEvent, GameCommand, GameEvent},
    map::{
        direction::Direction,
        grid::TileGrid,
        level::{LevelCatalog, LevelColor},
        parser::StartPositions,
    },
    systems::{
        components::{Ghost, GhostState, Path, PlayerControlled, RequestedDirection, Target},
        movement::{cell_center, Position, Velocity},
    },
};

/// The player entity, as seen by systems that also touch ghosts.
pub type PlayerAgents<'w, 's> = Query<
    'w,
    's,
    (&'static mut Position, &'static mut Velocity, &'static mut RequestedDirection),
    (With<PlayerControlled>, Without<Ghost>),
>;

/// Every ghost, with everything a reset or a collision may change.
pub type GhostAgents<'w, 's> = Query<
    'w,
    's,
    (
        &'static Ghost,
        &'static mut GhostState,
        &'static mut Position,
        &'static mut Velocity,
        &'static mut Target,
        &'static mut Path,
    ),
    Without<PlayerControlled>,
>;

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameStage {
    /// Nothing moves until the countdown runs out.
    Intro { remaining_ticks: u32 },
    /// The main gameplay loop is active.
    Playing,
    /// The player was caught; frozen until the death sequence is reported finished.
    PlayerDying,
    /// Every pellet was eaten. Waits for a confirm.
    Won,
    /// The player was caught with no lives in reserve. Waits for a confirm.
    Lost,
}

impl GameStage {
    pub fn intro(config: &GameConfig) -> Self {
        Self::Intro {
            remaining_ticks: config.intro_ticks(),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, GameStage::Playing)
    }

    /// Won or lost.
    pub fn is_over(&self) -> bool {
        matches!(self, GameStage::Won | GameStage::Lost)
    }
}

/// Score and lives for the current game.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub score: u32,
    /// Lives held in reserve. Being caught with none left loses the game.
    pub lives: u32,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            lives: config.starting_lives,
        }
    }
}

/// The power-up window opened by eating a power pellet.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerUp {
    pub active: bool,
    /// Frames since the window opened.
    pub elapsed: u32,
    /// Ghosts eaten in this window.
    pub chain: u32,
}

impl PowerUp {
    /// Opens (or restarts) the window.
    pub fn activate(&mut self) {
        *self = PowerUp {
            active: true,
            elapsed: 0,
            chain: 0,
        };
    }

    pub fn deactivate(&mut self) {
        *self = PowerUp::default();
    }

    /// Counts another eaten ghost and returns what it is worth: 400, 800, 1600, 3200...
    pub fn next_ghost_score(&mut self) -> u32 {
        self.chain += 1;
        GHOST_SCORE_BASE.saturating_mul(2u32.saturating_pow(self.chain))
    }
}

/// A frame counter that cycles through `0..=fps`, used to blink power pellets.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationCounter(pub u32);

impl AnimationCounter {
    pub fn power_pellets_visible(&self, config: &GameConfig) -> bool {
        self.0 > config.fps / 2
    }
}

/// The level currently on the board.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLevel {
    pub index: usize,
    pub color: LevelColor,
    pub starts: StartPositions,
}

/// Replaces the board with a fresh copy of level `index`.
pub fn load_level(catalog: &LevelCatalog, index: usize, grid: &mut TileGrid, current: &mut CurrentLevel) -> GameResult<()> {
    let level = catalog.get(index)?;
    *grid = TileGrid::from_level(level);
    *current = CurrentLevel {
        index,
        color: level.color,
        starts: level.starts,
    };
    info!(level = index, pellets = grid.dots_left(), "Level loaded");
    Ok(())
}

/// Puts the player back on its start cell, heading right.
pub fn reset_player(
    position: &mut Position,
    velocity: &mut Velocity,
    requested: &mut RequestedDirection,
    starts: &StartPositions,
    config: &GameConfig,
) {
    *position = Position::from_tile(starts.player);
    *velocity = Velocity {
        direction: Direction::Right,
        speed: config.player_speed,
    };
    *requested = RequestedDirection(Direction::Right);
}

/// Puts every ghost back on its spawn cell in its normal state.
pub fn reset_ghosts(ghosts: &mut GhostAgents, starts: &StartPositions, config: &GameConfig) {
    for (ghost, mut state, mut position, mut velocity, mut target, mut path) in ghosts.iter_mut() {
        let spawn = ghost.spawn_tile(starts);
        *state = GhostState::Normal;
        *position = Position::from_tile(spawn);
        *velocity = Velocity {
            direction: Direction::default(),
            speed: config.ghost_speed,
        };
        *target = Target(cell_center(spawn));
        path.0.clear();
    }
}

/// Counts down the intro and starts play when it runs out.
pub fn stage_timer_system(mut stage: ResMut<GameStage>) {
    match *stage {
        GameStage::Intro { remaining_ticks } if remaining_ticks > 0 => {
            *stage = GameStage::Intro {
                remaining_ticks: remaining_ticks - 1,
            };
        }
        GameStage::Intro { .. } => {
            *stage = GameStage::Playing;
            info!("Play started");
        }
        _ => {}
    }
}

pub fn animation_system(config: Res<GameConfig>, mut counter: ResMut<AnimationCounter>) {
    counter.0 = if counter.0 < config.fps { counter.0 + 1 } else { 0 };
}

/// Ages the power-up window, calming every ghost once it runs out. Frozen outside of play.
pub fn power_up_timer_system(
    stage: Res<GameStage>,
    config: Res<GameConfig>,
    mut power: ResMut<PowerUp>,
    mut ghosts: Query<(&mut GhostState, &mut Velocity), With<Ghost>>,
) {
    if !stage.is_playing() || !power.active {
        return;
    }

    if power.elapsed < config.power_up_ticks() {
        power.elapsed += 1;
        return;
    }

    power.deactivate();
    for (mut state, mut velocity) in ghosts.iter_mut() {
        state.calm();
        velocity.speed = config.ghost_speed;
    }
    debug!("Power-up expired");
}

/// Handles the commands that move the game between stages.
#[allow(clippy::too_many_arguments)]
pub fn stage_command_system(
    mut events: EventReader<GameEvent>,
    mut stage: ResMut<GameStage>,
    config: Res<GameConfig>,
    catalog: Res<LevelCatalog>,
    mut grid: ResMut<TileGrid>,
    mut level: ResMut<CurrentLevel>,
    mut session: ResMut<Session>,
    mut power: ResMut<PowerUp>,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
    mut players: PlayerAgents,
    mut ghosts: GhostAgents,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event;
        match command {
            GameCommand::DeathSequenceFinished => {
                if *stage == GameStage::PlayerDying {
                    *stage = GameStage::intro(&config);
                    audio.write(AudioEvent::Intro);
                    debug!("Death sequence finished, restarting intro");
                }
            }
            GameCommand::Confirm => {
                let next = match *stage {
                    GameStage::Lost => {
                        *session = Session::new(&config);
                        audio.write(AudioEvent::Intro);
                        0
                    }
                    GameStage::Won => {
                        audio.write(AudioEvent::Intermission);
                        catalog.next_index(level.index)
                    }
                    _ => continue,
                };

                if let Err(e) = load_level(&catalog, next, &mut grid, &mut level) {
                    errors.write(e);
                    continue;
                }

                power.deactivate();
                if let Ok((mut position, mut velocity, mut requested)) = players.single_mut() {
                    reset_player(&mut position, &mut velocity, &mut requested, &level.starts, &config);
                }
                reset_ghosts(&mut ghosts, &level.starts, &config);
                *stage = GameStage::intro(&config);
            }
            _ => {}
        }
    }
}
