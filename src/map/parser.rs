//! Map parsing functionality for converting raw board layouts into tile codes and start markers.

use glam::{IVec2, UVec2};

use crate::error::ParseError;
use crate::map::grid::TileCode;

/// Start markers found while parsing a board, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPositions {
    /// The player's starting cell (`X`).
    pub player: IVec2,
    /// The direct chaser's starting cell (`b`).
    pub blinky: IVec2,
    /// The midpoint chaser's starting cell (`i`).
    pub inky: IVec2,
    /// The ambusher's starting cell (`p`).
    pub pinky: IVec2,
    /// The ghost home (`H`): where eaten ghosts return to, and where the greedy ghost starts.
    pub home: IVec2,
}

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone)]
pub struct ParsedBoard {
    /// Row-major tile codes.
    pub tiles: Vec<TileCode>,
    /// Board size in cells (columns, rows).
    pub size: UVec2,
    pub starts: StartPositions,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Characters that mark start positions. All of them are parsed as empty tiles.
    pub const MARKERS: [char; 5] = ['X', 'b', 'i', 'p', 'H'];

    /// Parses a single character into a tile code.
    ///
    /// # Arguments
    ///
    /// * `c` - The character to parse
    ///
    /// # Returns
    ///
    /// The parsed tile code, or an error if the character is unknown.
    pub fn parse_character(c: char) -> Result<TileCode, ParseError> {
        match c {
            ' ' => Ok(TileCode::Empty),
            '.' => Ok(TileCode::Pellet),
            'o' => Ok(TileCode::PowerPellet),
            '=' => Ok(TileCode::Door),
            '|' => Ok(TileCode::WallVertical),
            '-' => Ok(TileCode::WallHorizontal),
            '7' => Ok(TileCode::CornerTopRight),
            'F' => Ok(TileCode::CornerTopLeft),
            'L' => Ok(TileCode::CornerBottomLeft),
            'J' => Ok(TileCode::CornerBottomRight),
            c if Self::MARKERS.contains(&c) => Ok(TileCode::Empty),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into tile codes and start markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, contains unknown characters, has rows of
    /// differing widths, or does not contain every start marker exactly once.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedBoard, ParseError> {
        let width = raw_board.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ParseError::RowCount { expected: 1, found: 0 });
        }

        let mut tiles = Vec::with_capacity(width * raw_board.len());
        let mut markers: [Option<IVec2>; 5] = [None; 5];

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow { row: y, expected: width, found });
            }

            for (x, character) in line.chars().enumerate() {
                tiles.push(Self::parse_character(character)?);

                if let Some(slot) = Self::MARKERS.iter().position(|&m| m == character) {
                    if markers[slot].is_some() {
                        return Err(ParseError::DuplicateMarker(character));
                    }
                    markers[slot] = Some(IVec2::new(x as i32, y as i32));
                }
            }
        }

        let marker = |slot: usize| markers[slot].ok_or(ParseError::MissingMarker(Self::MARKERS[slot]));
        let starts = StartPositions {
            player: marker(0)?,
            blinky: marker(1)?,
            inky: marker(2)?,
            pinky: marker(3)?,
            home: marker(4)?,
        };

        Ok(ParsedBoard {
            tiles,
            size: UVec2::new(width as u32, raw_board.len() as u32),
            starts,
        })
    }
}
