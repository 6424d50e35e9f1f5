use bevy_ecs::component::Component;
use glam::IVec2;

use crate::constants::{CELL_CENTER_OFFSET, CELL_SIZE, GHOST_BLOCKING_CODE, PLAYER_BLOCKING_CODE, SPRITE_OFFSET};
use crate::map::direction::{Direction, DirectionFlags};
use crate::map::grid::TileGrid;

/// An agent's top-left corner on the board, in pixels.
///
/// Positions may leave the board horizontally while an agent crosses the side tunnel.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position(pub IVec2);

impl Position {
    /// The position whose corner sits on the corner of `tile`.
    pub fn from_tile(tile: IVec2) -> Self {
        Self(tile * CELL_SIZE)
    }

    /// The point used for collisions and targeting.
    pub fn center(&self) -> IVec2 {
        self.0 + IVec2::splat(CELL_CENTER_OFFSET)
    }

    /// Where a renderer should put the top-left corner of the sprite.
    pub fn render_position(&self) -> IVec2 {
        self.0 - IVec2::splat(SPRITE_OFFSET)
    }

    /// The cell containing the corner. Used for movement legality.
    pub fn tile(&self) -> IVec2 {
        self.0.div_euclid(IVec2::splat(CELL_SIZE))
    }

    /// The cell containing the center. Used for collisions and targeting.
    pub fn center_tile(&self) -> IVec2 {
        cell_of(self.center())
    }

    pub fn is_aligned_x(&self) -> bool {
        self.0.x.rem_euclid(CELL_SIZE) == 0
    }

    pub fn is_aligned_y(&self) -> bool {
        self.0.y.rem_euclid(CELL_SIZE) == 0
    }

    /// Whether the corner sits exactly on a cell corner.
    pub fn is_aligned(&self) -> bool {
        self.is_aligned_x() && self.is_aligned_y()
    }

    /// Moves one pixel in `direction`.
    pub fn step(&mut self, direction: Direction) {
        self.0 += direction.as_ivec2();
    }
}

/// The cell containing a pixel.
pub fn cell_of(pixel: IVec2) -> IVec2 {
    pixel.div_euclid(IVec2::splat(CELL_SIZE))
}

/// The center pixel of a cell, as agents see it.
pub fn cell_center(tile: IVec2) -> IVec2 {
    tile * CELL_SIZE + IVec2::splat(CELL_CENTER_OFFSET)
}

/// Facing and pixels-per-frame for a moving agent.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Velocity {
    pub direction: Direction,
    pub speed: u32,
}

/// Directions the player may step in from `position` while facing `facing`.
pub fn player_directions(grid: &TileGrid, position: &Position, facing: Direction) -> DirectionFlags {
    open_directions(grid, position, PLAYER_BLOCKING_CODE, Some(facing))
}

/// Directions the greedy ghost may step in from `position`. Doors are open to it.
pub fn greedy_directions(grid: &TileGrid, position: &Position) -> DirectionFlags {
    open_directions(grid, position, GHOST_BLOCKING_CODE, None)
}

/// Shared legality rules. Perpendicular turns need the agent to be aligned on the other axis.
///
/// Up and left are measured from the cell holding the corner, so an agent part-way into that cell
/// may always finish closing the gap even if the next cell is a wall. For the player this only
/// applies when it is already heading that way.
fn open_directions(grid: &TileGrid, position: &Position, max_code: u8, facing: Option<Direction>) -> DirectionFlags {
    let tile = position.tile();
    if grid.is_warp_column(tile.x) {
        return DirectionFlags::HORIZONTAL;
    }

    let open = |direction: Direction| grid.is_passable(tile + direction.as_ivec2(), max_code);
    let finishing = |direction: Direction| facing.is_none_or(|facing| facing == direction);
    let origin = tile * CELL_SIZE;

    let mut flags = DirectionFlags::empty();
    if open(Direction::Down) && position.is_aligned_x() {
        flags |= DirectionFlags::DOWN;
    }
    if (open(Direction::Up) && position.is_aligned_x()) || (finishing(Direction::Up) && position.0.y > origin.y) {
        flags |= DirectionFlags::UP;
    }
    if open(Direction::Right) && position.is_aligned_y() {
        flags |= DirectionFlags::RIGHT;
    }
    if (open(Direction::Left) && position.is_aligned_y()) || (finishing(Direction::Left) && position.0.x > origin.x) {
        flags |= DirectionFlags::LEFT;
    }
    flags
}
