//! This module defines the game map: its tile grid, level templates and board parsing.

pub mod direction;
pub mod grid;
pub mod level;
pub mod parser;
