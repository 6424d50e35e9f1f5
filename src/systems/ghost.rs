use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res},
};
use glam::IVec2;
use tracing::{debug, trace};

use crate::{
    constants::{AMBUSH_LOOKAHEAD, CELL_SIZE},
    map::{direction::Direction, grid::TileGrid},
    systems::{
        components::{Ghost, GhostState, GhostStrategy, Path, PlayerControlled, Target},
        movement::{cell_center, cell_of, greedy_directions, Position, Velocity},
        pathfinding::find_path,
        state::{CurrentLevel, GameStage},
    },
};

/// Where a chasing ghost with `strategy` aims, given the player's center and facing.
///
/// Targets that land outside the inner board or inside a wall fall back to the player's center.
pub fn chase_target(
    strategy: GhostStrategy,
    grid: &TileGrid,
    player_center: IVec2,
    player_facing: Direction,
    blinky_center: IVec2,
) -> IVec2 {
    let aimed = match strategy {
        GhostStrategy::Direct | GhostStrategy::Greedy => return player_center,
        GhostStrategy::Midpoint => (blinky_center + player_center) / 2,
        GhostStrategy::Ambush => player_center + player_facing.as_ivec2() * AMBUSH_LOOKAHEAD * CELL_SIZE,
    };

    if grid.is_targetable(cell_of(aimed)) {
        aimed
    } else {
        player_center
    }
}

/// Recomputes every ghost's target from the player, its strategy and its state.
pub fn ghost_target_system(
    grid: Res<TileGrid>,
    level: Res<CurrentLevel>,
    players: Query<(&Position, &Velocity), (With<PlayerControlled>, Without<Ghost>)>,
    mut ghosts: Query<(&Ghost, &GhostState, &Position, &mut Target), Without<PlayerControlled>>,
) {
    let Ok((player, player_velocity)) = players.single() else {
        return;
    };

    let player_center = player.center();
    let blinky_center = ghosts
        .iter()
        .find(|(ghost, ..)| **ghost == Ghost::Blinky)
        .map_or(player_center, |(_, _, position, _)| position.center());

    for (ghost, state, _, mut target) in ghosts.iter_mut() {
        let aimed = match state {
            GhostState::Eaten { .. } => cell_center(level.starts.home),
            GhostState::Frightened => cell_center(ghost.scatter_corner()),
            GhostState::Normal | GhostState::Bitten => chase_target(
                ghost.strategy(),
                &grid,
                player_center,
                player_velocity.direction,
                blinky_center,
            ),
        };
        if target.0 != aimed {
            target.0 = aimed;
        }
    }
}

/// Plans a fresh route from the ghost's center cell to its target cell.
fn plan_path(ghost: Ghost, grid: &TileGrid, position: &Position, target: &Target, path: &mut Path) {
    let start = position.center_tile();
    let goal = cell_of(target.0);
    match find_path(grid, start, goal, ghost.strategy().heuristic()) {
        Some(route) => {
            trace!(ghost = ghost.as_ref(), ?start, ?goal, length = route.len(), "Path planned");
            path.0 = route.into();
        }
        None => {
            debug!(ghost = ghost.as_ref(), ?start, ?goal, "No path to target");
            path.0.clear();
        }
    }
}

/// Takes one pixel toward the center of the next cell on the path, x before y.
fn follow_path(position: &mut Position, velocity: &mut Velocity, path: &mut Path) {
    while let Some(&next) = path.0.front() {
        let goal = cell_center(next);
        let center = position.center();
        let direction = if goal.x > center.x {
            Direction::Right
        } else if goal.x < center.x {
            Direction::Left
        } else if goal.y < center.y {
            Direction::Up
        } else if goal.y > center.y {
            Direction::Down
        } else {
            path.0.pop_front();
            continue;
        };

        position.step(direction);
        velocity.direction = direction;
        if position.center() == goal {
            path.0.pop_front();
        }
        return;
    }
}

/// Takes one pixel along the first preferred axis that closes in on the target: up, right, left, down.
fn greedy_step(grid: &TileGrid, position: &mut Position, velocity: &mut Velocity, target: &Target) {
    let open = greedy_directions(grid, position);
    let center = position.center();
    let preferences = [
        (Direction::Up, target.0.y < center.y),
        (Direction::Right, target.0.x > center.x),
        (Direction::Left, target.0.x < center.x),
        (Direction::Down, target.0.y > center.y),
    ];

    if let Some((direction, _)) = preferences
        .into_iter()
        .find(|&(direction, closer)| closer && open.allows(direction))
    {
        position.step(direction);
        velocity.direction = direction;
    }
}

/// Moves every ghost `speed` pixels toward its target.
///
/// Path-driven ghosts replan whenever they sit exactly on a cell corner, at most once per corner
/// per frame, and only while the player is over the board. Otherwise they keep consuming the
/// path they already have.
pub fn ghost_movement_system(
    stage: Res<GameStage>,
    grid: Res<TileGrid>,
    players: Query<&Position, (With<PlayerControlled>, Without<Ghost>)>,
    mut ghosts: Query<(&Ghost, &GhostState, &mut Position, &mut Velocity, &Target, &mut Path), Without<PlayerControlled>>,
) {
    if !stage.is_playing() {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let player_column = player.center_tile().x;
    let player_on_board = (0..grid.width()).contains(&player_column);

    for (ghost, state, mut position, mut velocity, target, mut path) in ghosts.iter_mut() {
        if ghost.strategy() == GhostStrategy::Greedy && !state.is_eaten() {
            for _ in 0..velocity.speed {
                greedy_step(&grid, &mut position, &mut velocity, target);
            }
            continue;
        }

        let mut planned_at = None;
        for _ in 0..velocity.speed {
            if position.is_aligned() && player_on_board && planned_at != Some(position.0) {
                plan_path(*ghost, &grid, &position, target, &mut path);
                planned_at = Some(position.0);
            }
            follow_path(&mut position, &mut velocity, &mut path);
        }
    }
}
