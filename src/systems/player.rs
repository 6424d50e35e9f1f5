use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use tracing::{info, trace};

use crate::{
    config::GameConfig,
    constants::CELL_SIZE,
    error::GameError,
    events::{AudioEvent, GameCommand, GameEvent},
    map::grid::TileGrid,
    systems::{
        collision::{catch_player, resolve_player_step, Scoreboard, StepOutcome},
        components::{GlobalState, PlayerControlled, RequestedDirection},
        movement::{player_directions, Position, Velocity},
        state::{CurrentLevel, GameStage, GhostAgents, PlayerAgents, PowerUp, Session},
    },
};

/// Applies direction and quit commands.
pub fn player_control_system(
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GlobalState>,
    mut players: Query<(&mut RequestedDirection, &Velocity), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event;
        match *command {
            GameCommand::Quit => {
                state.exit = true;
            }
            GameCommand::Press(direction) => {
                let Ok((mut requested, _)) = players.single_mut() else {
                    errors.write(GameError::InvalidState("No player entity found".to_string()));
                    continue;
                };
                requested.0 = direction;
            }
            GameCommand::Release(direction) => {
                if let Ok((mut requested, velocity)) = players.single_mut() {
                    // Letting go of the held key drops any turn that was still pending.
                    if requested.0 == direction {
                        requested.0 = velocity.direction;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Wraps a player that has left the board through the side tunnel back in from the other side.
pub fn wrap_tunnel(position: &mut Position, grid: &TileGrid) {
    let board_width = grid.width() * CELL_SIZE;
    if position.0.x > board_width {
        position.0.x = -CELL_SIZE;
    } else if position.0.x < -CELL_SIZE {
        position.0.x = board_width;
    }
}

/// Moves the player one pixel at a time, resolving collisions after every step.
#[allow(clippy::too_many_arguments)]
pub fn player_movement_system(
    config: Res<GameConfig>,
    level: Res<CurrentLevel>,
    mut stage: ResMut<GameStage>,
    mut grid: ResMut<TileGrid>,
    mut session: ResMut<Session>,
    mut power: ResMut<PowerUp>,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
    mut players: PlayerAgents,
    mut ghosts: GhostAgents,
) {
    if !stage.is_playing() {
        return;
    }

    let Ok((mut position, mut velocity, mut requested)) = players.single_mut() else {
        errors.write(GameError::InvalidState("No player entity found".to_string()));
        return;
    };

    wrap_tunnel(&mut position, &grid);

    for _ in 0..velocity.speed {
        let open = player_directions(&grid, &position, velocity.direction);
        if open.allows(requested.0) {
            velocity.direction = requested.0;
        }
        if open.allows(velocity.direction) {
            position.step(velocity.direction);
            trace!(position = ?position.0, direction = velocity.direction.as_ref(), "Player stepped");
        }

        let board = Scoreboard {
            grid: &mut grid,
            session: &mut session,
            power: &mut power,
        };
        match resolve_player_step(position.center(), board, &mut ghosts, level.starts.home, &config, &mut audio) {
            StepOutcome::Continue => {}
            StepOutcome::LevelCleared => {
                *stage = GameStage::Won;
                info!(score = session.score, level = level.index, "Level cleared");
                break;
            }
            StepOutcome::PlayerCaught => {
                catch_player(
                    &mut stage,
                    &mut session,
                    &mut power,
                    (&mut position, &mut velocity, &mut requested),
                    &mut ghosts,
                    &level.starts,
                    &config,
                    &mut audio,
                );
                break;
            }
        }
    }
}
