use std::collections::VecDeque;

use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res},
};
use glam::IVec2;
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    constants::{CELL_SIZE, PELLET_SCORE, POWER_PELLET_SCORE},
    events::AudioEvent,
    map::{
        grid::{Pellet, TileGrid},
        parser::StartPositions,
    },
    systems::{
        components::{Ghost, GhostState, Path, PlayerControlled, RequestedDirection},
        movement::{cell_center, cell_of, Position, Velocity},
        pathfinding::find_path,
        state::{reset_ghosts, reset_player, GameStage, GhostAgents, PowerUp, Session},
    },
};

/// What a single collision pass decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// The last pellet is gone.
    LevelCleared,
    /// A live ghost shares the player's cell.
    PlayerCaught,
}

/// Mutable session state a collision pass writes to.
pub struct Scoreboard<'a> {
    pub grid: &'a mut TileGrid,
    pub session: &'a mut Session,
    pub power: &'a mut PowerUp,
}

/// Resolves whatever the player's center touches after one unit-step.
///
/// Nothing is resolved while the center is outside the board horizontally, i.e. in the tunnel.
pub fn resolve_player_step(
    player_center: IVec2,
    board: Scoreboard,
    ghosts: &mut GhostAgents,
    home: IVec2,
    config: &GameConfig,
    audio: &mut EventWriter<AudioEvent>,
) -> StepOutcome {
    let Scoreboard { grid, session, power } = board;
    if player_center.x <= 0 || player_center.x >= grid.width() * CELL_SIZE {
        return StepOutcome::Continue;
    }

    let tile = cell_of(player_center);
    match grid.consume_pellet(tile) {
        Pellet::Small => {
            session.score += PELLET_SCORE;
            audio.write(AudioEvent::PelletEaten);
        }
        Pellet::Power => {
            session.score += POWER_PELLET_SCORE;
            power.activate();
            frighten_ghosts(ghosts, config);
            audio.write(AudioEvent::PowerPelletEaten);
            debug!(score = session.score, "Power pellet eaten");
        }
        Pellet::None => {}
    }

    if grid.dots_left() == 0 {
        return StepOutcome::LevelCleared;
    }

    for (ghost, mut state, position, mut velocity, mut target, mut path) in ghosts.iter_mut().sort::<&Ghost>() {
        if position.center_tile() != tile {
            continue;
        }

        if state.eat() {
            let points = power.next_ghost_score();
            session.score += points;
            velocity.speed = config.ghost_speed;
            target.0 = cell_center(home);
            path.0 = find_path(grid, position.center_tile(), home, ghost.strategy().heuristic())
                .map(VecDeque::from)
                .unwrap_or_default();
            audio.write(AudioEvent::GhostEaten);
            debug!(ghost = ghost.as_ref(), points, chain = power.chain, "Ghost eaten");
        } else if state.is_threat() {
            debug!(ghost = ghost.as_ref(), ?tile, "Player caught");
            return StepOutcome::PlayerCaught;
        }
    }

    StepOutcome::Continue
}

/// Power pellet transitions: every ghost turns edible and the live ones slow down.
pub fn frighten_ghosts(ghosts: &mut GhostAgents, config: &GameConfig) {
    for (_, mut state, _, mut velocity, _, _) in ghosts.iter_mut() {
        state.frighten();
        if !state.is_eaten() {
            velocity.speed = config.frightened_speed();
        }
    }
}

/// Takes a life, or ends the game if none are left.
///
/// With a life to spare the power-up is cancelled, every agent goes back to its start, and play
/// waits in [`GameStage::PlayerDying`] for the death sequence to finish.
#[allow(clippy::too_many_arguments)]
pub fn catch_player(
    stage: &mut GameStage,
    session: &mut Session,
    power: &mut PowerUp,
    player: (&mut Position, &mut Velocity, &mut RequestedDirection),
    ghosts: &mut GhostAgents,
    starts: &StartPositions,
    config: &GameConfig,
    audio: &mut EventWriter<AudioEvent>,
) {
    audio.write(AudioEvent::PlayerDeath);

    if session.lives == 0 {
        *stage = GameStage::Lost;
        info!(score = session.score, "Game lost");
        return;
    }

    session.lives -= 1;
    power.deactivate();
    let (position, velocity, requested) = player;
    reset_player(position, velocity, requested, starts, config);
    reset_ghosts(ghosts, starts, config);
    *stage = GameStage::PlayerDying;
    info!(lives = session.lives, score = session.score, "Player died");
}

/// Brings eaten ghosts back once they have run out of path, unless the player is standing on them.
pub fn eaten_ghost_revert_system(
    stage: Res<GameStage>,
    power: Res<PowerUp>,
    players: Query<&Position, (With<PlayerControlled>, Without<Ghost>)>,
    mut ghosts: Query<(&Ghost, &mut GhostState, &Position, &Path), Without<PlayerControlled>>,
) {
    if !stage.is_playing() {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let player_tile = player.center_tile();

    for (ghost, mut state, position, path) in ghosts.iter_mut() {
        if state.is_eaten() && path.0.is_empty() && position.center_tile() != player_tile {
            state.revive(power.active);
            debug!(ghost = ghost.as_ref(), state = ?*state, "Ghost revived");
        }
    }
}
