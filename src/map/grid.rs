//! The mutable tile grid for the level currently being played.

use bevy_ecs::resource::Resource;
use glam::{IVec2, UVec2};
use strum_macros::{EnumIter, FromRepr};
use tracing::trace;

use crate::constants::{GHOST_BLOCKING_CODE, PELLET_SCORE, POWER_PELLET_SCORE};
use crate::error::MapError;
use crate::map::level::Level;

/// The code stored in each grid cell.
///
/// Everything from [`TileCode::Door`] upwards blocks the player, everything from
/// [`TileCode::WallVertical`] upwards blocks ghosts as well. The wall variants only differ
/// in how a renderer would draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter)]
#[repr(u8)]
pub enum TileCode {
    Empty = 0,
    Pellet = 1,
    PowerPellet = 2,
    Door = 3,
    WallVertical = 4,
    WallHorizontal = 5,
    CornerTopRight = 6,
    CornerTopLeft = 7,
    CornerBottomLeft = 8,
    CornerBottomRight = 9,
}

impl TileCode {
    /// The raw numeric code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The pellet held by this tile, if any.
    pub const fn pellet(self) -> Pellet {
        match self {
            TileCode::Pellet => Pellet::Small,
            TileCode::PowerPellet => Pellet::Power,
            _ => Pellet::None,
        }
    }
}

impl TryFrom<u8> for TileCode {
    type Error = MapError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TileCode::from_repr(code).ok_or(MapError::UnknownTileCode(code))
    }
}

/// The kind of pellet found on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pellet {
    None,
    Small,
    Power,
}

impl Pellet {
    /// Points awarded for eating this pellet.
    pub const fn score(self) -> u32 {
        match self {
            Pellet::None => 0,
            Pellet::Small => PELLET_SCORE,
            Pellet::Power => POWER_PELLET_SCORE,
        }
    }
}

/// Wall topology plus the remaining pellets of the current level.
///
/// Copied from a [`Level`] template on every load, so pellet consumption never touches the template.
/// `dots_left` is counted once on construction and then only decremented by [`TileGrid::consume_pellet`].
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<TileCode>,
    size: UVec2,
    dots_left: u32,
}

impl TileGrid {
    /// Creates a grid from row-major tiles. `tiles.len()` must equal `size.x * size.y`.
    pub(crate) fn new(tiles: Vec<TileCode>, size: UVec2) -> Self {
        debug_assert_eq!(tiles.len(), (size.x * size.y) as usize);
        let dots_left = tiles.iter().filter(|tile| tile.pellet() != Pellet::None).count() as u32;
        Self { tiles, size, dots_left }
    }

    /// Copies the tiles of a level template.
    pub fn from_level(level: &Level) -> Self {
        Self::new(level.tiles.clone(), level.size)
    }

    /// Builds a grid from raw numeric codes, one slice per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty, the rows differ in length, or a code is unknown.
    pub fn from_codes(rows: &[&[u8]]) -> Result<Self, MapError> {
        let width = rows.first().map(|row| row.len()).unwrap_or(0);
        if width == 0 {
            return Err(MapError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::RaggedGrid {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for &code in row.iter() {
                tiles.push(TileCode::try_from(code)?);
            }
        }

        Ok(Self::new(tiles, UVec2::new(width as u32, rows.len() as u32)))
    }

    /// The grid size, in cells (columns, rows).
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.x as i32
    }

    pub fn height(&self) -> i32 {
        self.size.y as i32
    }

    /// The number of pellets and power pellets still on the board.
    pub fn dots_left(&self) -> u32 {
        self.dots_left
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width() && tile.y < self.height()
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        self.in_bounds(tile).then(|| (tile.y * self.width() + tile.x) as usize)
    }

    /// The code at `tile`, or `None` outside the grid.
    pub fn code(&self, tile: IVec2) -> Option<TileCode> {
        self.index(tile).map(|index| self.tiles[index])
    }

    /// Whether `tile` holds a code strictly below `max_code`. Tiles outside the grid are never passable.
    pub fn is_passable(&self, tile: IVec2, max_code: u8) -> bool {
        self.code(tile).is_some_and(|code| code.code() < max_code)
    }

    /// Whether `col` lies in the side warp corridor, where only horizontal movement exists.
    pub fn is_warp_column(&self, col: i32) -> bool {
        col < 1 || col > self.width() - 2
    }

    /// Whether a targeting point may be aimed at `tile`: inside the outer ring and not a wall.
    pub fn is_targetable(&self, tile: IVec2) -> bool {
        let inner = tile.x >= 1 && tile.y >= 1 && tile.x <= self.width() - 2 && tile.y <= self.height() - 2;
        inner && self.is_passable(tile, GHOST_BLOCKING_CODE)
    }

    /// Removes the pellet at `tile`, returning what was there.
    ///
    /// Consuming an empty (or out of bounds) tile is a no-op and leaves `dots_left` untouched.
    pub fn consume_pellet(&mut self, tile: IVec2) -> Pellet {
        let Some(index) = self.index(tile) else {
            return Pellet::None;
        };

        let pellet = self.tiles[index].pellet();
        if pellet != Pellet::None {
            self.tiles[index] = TileCode::Empty;
            self.dots_left -= 1;
            trace!(?tile, ?pellet, dots_left = self.dots_left, "Pellet consumed");
        }
        pellet
    }

    /// Counts the pellets currently on the board by scanning every tile.
    pub fn count_pellets(&self) -> u32 {
        self.pellets().count() as u32
    }

    /// Iterates over the remaining pellets and their tiles.
    pub fn pellets(&self) -> impl Iterator<Item = (IVec2, Pellet)> + '_ {
        let width = self.width();
        self.tiles.iter().enumerate().filter_map(move |(index, code)| {
            let pellet = code.pellet();
            (pellet != Pellet::None).then(|| (IVec2::new(index as i32 % width, index as i32 / width), pellet))
        })
    }
}
