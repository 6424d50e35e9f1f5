//! Centralized error types for the simulation.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;
use glam::IVec2;

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur while loading or running a game.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("Board is missing the {0:?} marker")]
    MissingMarker(char),
    #[error("Board has more than one {0:?} marker")]
    DuplicateMarker(char),
}

/// Errors related to tile grids and level templates.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Unknown tile code: {0}")]
    UnknownTileCode(u8),

    #[error("Grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },

    #[error("Grid is empty")]
    EmptyGrid,

    #[error("Level has no pellets")]
    NoPellets,

    #[error("Pellet at {0} cannot be reached from the player start")]
    UnreachablePellet(IVec2),

    #[error("{what} at {tile} is not passable")]
    BlockedTile { what: &'static str, tile: IVec2 },

    #[error("{what} at {tile} cannot be reached from the ghost home")]
    UnreachableFromHome { what: &'static str, tile: IVec2 },

    #[error("Level {0} does not exist")]
    UnknownLevel(usize),
}

/// Errors raised while loading or validating the runtime configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
