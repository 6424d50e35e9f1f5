//! Immutable level templates and the catalog they are selected from.

use std::collections::HashSet;

use bevy_ecs::resource::Resource;
use glam::{IVec2, UVec2};
use pathfinding::prelude::bfs_reach;
use tracing::{debug, info};

use crate::constants::{BOARD_CELL_SIZE, GHOST_BLOCKING_CODE, PLAYER_BLOCKING_CODE, RAW_LEVELS, SCATTER_CORNERS};
use crate::error::{GameResult, MapError, ParseError};
use crate::map::direction::Direction;
use crate::map::grid::{Pellet, TileCode, TileGrid};
use crate::map::parser::{MapTileParser, StartPositions};
use crate::systems::pathfinding::neighbors;

/// The display color of a level's walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LevelColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A level as authored: one string per board row plus the wall color.
#[derive(Debug, Clone, Copy)]
pub struct RawLevel {
    pub board: [&'static str; BOARD_CELL_SIZE.y as usize],
    pub color: LevelColor,
}

/// A parsed and validated level template. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub index: usize,
    pub tiles: Vec<TileCode>,
    pub size: UVec2,
    pub color: LevelColor,
    pub starts: StartPositions,
}

impl Level {
    /// Parses and validates a built-in level.
    pub fn new(index: usize, raw: &RawLevel) -> GameResult<Level> {
        Self::parse(index, &raw.board, raw.color)
    }

    /// Parses and validates a board of any origin.
    ///
    /// # Errors
    ///
    /// Fails if the board does not match the fixed board size, does not parse, has no pellets,
    /// has pellets the player cannot reach, blocks a ghost corner or the ghost home, or walls off a
    /// start cell from the ghost home.
    pub fn parse(index: usize, board: &[&str], color: LevelColor) -> GameResult<Level> {
        if board.len() != BOARD_CELL_SIZE.y as usize {
            return Err(ParseError::RowCount {
                expected: BOARD_CELL_SIZE.y as usize,
                found: board.len(),
            }
            .into());
        }

        let parsed = MapTileParser::parse_board(board)?;
        if parsed.size != BOARD_CELL_SIZE {
            return Err(ParseError::RaggedRow {
                row: 0,
                expected: BOARD_CELL_SIZE.x as usize,
                found: parsed.size.x as usize,
            }
            .into());
        }

        let level = Level {
            index,
            tiles: parsed.tiles,
            size: parsed.size,
            color,
            starts: parsed.starts,
        };
        level.validate()?;

        debug!(index, pellets = level.pellet_count(), "Level parsed");
        Ok(level)
    }

    fn pellet_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.pellet() != Pellet::None).count()
    }

    fn validate(&self) -> Result<(), MapError> {
        let grid = TileGrid::from_level(self);
        if grid.dots_left() == 0 {
            return Err(MapError::NoPellets);
        }

        for (what, tile) in SCATTER_CORNERS
            .iter()
            .map(|&corner| ("Ghost corner", corner))
            .chain([("Ghost home", self.starts.home)])
        {
            if !grid.is_passable(tile, GHOST_BLOCKING_CODE) {
                return Err(MapError::BlockedTile { what, tile });
            }
        }

        let width = grid.width();
        let reachable: HashSet<IVec2> = bfs_reach(self.starts.player, |&tile| {
            let directions: &[Direction] = if grid.is_warp_column(tile.x) {
                &[Direction::Left, Direction::Right]
            } else {
                &Direction::DIRECTIONS
            };
            directions
                .iter()
                .map(move |&direction| {
                    let mut next = tile + direction.as_ivec2();
                    next.x = next.x.rem_euclid(width);
                    next
                })
                .filter(|&next| grid.is_passable(next, PLAYER_BLOCKING_CODE))
                .collect::<Vec<_>>()
        })
        .collect();

        if let Some((tile, _)) = grid.pellets().find(|(tile, _)| !reachable.contains(tile)) {
            return Err(MapError::UnreachablePellet(tile));
        }

        let from_home: HashSet<IVec2> = bfs_reach(self.starts.home, |&tile| neighbors(&grid, tile)).collect();
        let starts = [
            ("Player start", self.starts.player),
            ("Blinky start", self.starts.blinky),
            ("Inky start", self.starts.inky),
            ("Pinky start", self.starts.pinky),
        ];
        if let Some((what, tile)) = starts.into_iter().find(|(_, tile)| !from_home.contains(tile)) {
            return Err(MapError::UnreachableFromHome { what, tile });
        }

        Ok(())
    }
}

/// Every playable level, in play order.
#[derive(Resource, Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Parses and validates the built-in levels.
    pub fn builtin() -> GameResult<Self> {
        let levels = RAW_LEVELS
            .iter()
            .enumerate()
            .map(|(index, raw)| Level::new(index, raw))
            .collect::<GameResult<Vec<_>>>()?;

        info!(levels = levels.len(), "Level catalog loaded");
        Ok(Self { levels })
    }

    /// Creates a catalog from already validated levels.
    pub fn from_levels(levels: Vec<Level>) -> GameResult<Self> {
        if levels.is_empty() {
            return Err(MapError::UnknownLevel(0).into());
        }
        Ok(Self { levels })
    }

    pub fn get(&self, index: usize) -> GameResult<&Level> {
        self.levels.get(index).ok_or_else(|| MapError::UnknownLevel(index).into())
    }

    /// The level played after `index`, looping back to the first after the last.
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.levels.len() {
            0
        } else {
            index + 1
        }
    }
}
