//! This module contains all the constants used in the simulation.

use std::time::Duration;

use glam::{IVec2, UVec2};

use crate::map::level::{LevelColor, RawLevel};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each cell, in pixels.
pub const CELL_SIZE: i32 = 25;
/// Offset from a cell's top-left corner to the point agents consider their center.
pub const CELL_CENTER_OFFSET: i32 = CELL_SIZE / 2 + 1;
/// Offset from a cell's top-left corner back to where an agent's sprite is anchored.
pub const SPRITE_OFFSET: i32 = 10;

/// The size of the game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(30, 33);

/// Tile codes at or above this value block the player (door and walls).
pub const PLAYER_BLOCKING_CODE: u8 = 3;
/// Tile codes at or above this value block ghosts (walls only, ghosts may use the door).
pub const GHOST_BLOCKING_CODE: u8 = 4;

/// Points for a small pellet.
pub const PELLET_SCORE: u32 = 10;
/// Points for a power pellet.
pub const POWER_PELLET_SCORE: u32 = 50;
/// Base value doubled for every ghost eaten in a single power-up window.
pub const GHOST_SCORE_BASE: u32 = 200;

/// The corner cell each ghost flees to while frightened, ordered Blinky, Inky, Pinky, Clyde.
pub const SCATTER_CORNERS: [IVec2; 4] = [
    IVec2::new(27, 30),
    IVec2::new(2, 30),
    IVec2::new(27, 2),
    IVec2::new(2, 2),
];

/// How many cells ahead of the player the ambushing ghost aims.
pub const AMBUSH_LOOKAHEAD: i32 = 4;

/// The built-in levels, played in order and looping after the last.
///
/// Glyphs: `.` pellet, `o` power pellet, `=` ghost door, `|`/`-` straight walls, `7 F L J` corner walls,
/// `X` player start, `b i p` ghost starts and `H` the ghost home (also the greedy ghost's start).
pub const RAW_LEVELS: [RawLevel; 2] = [
    RawLevel {
        color: LevelColor::new(33, 33, 222),
        board: [
            "                              ",
            " F--------------------------7 ",
            " |............||............| ",
            " |.F--7.F---7.||.F---7.F--7.| ",
            " |o|  |.|   |.||.|   |.|  |o| ",
            " |.L--J.L---J.LJ.L---J.L--J.| ",
            " |..........................| ",
            " |.F--7.F7.F------7.F7.F--7.| ",
            " |.L--J.||.L------J.||.L--J.| ",
            " |......||....||....||......| ",
            " L----7.|---7 || F---|.F----J ",
            "      |.|---J LJ L---|.|      ",
            "      |.||    b     ||.|      ",
            "      |.|| F--==--7 ||.|      ",
            " -----J.LJ |      | LJ.L----- ",
            "       .   |i p H |   .       ",
            " -----7.F7 |      | F7.F----- ",
            "      |.|| L------J ||.|      ",
            "      |.||          ||.|      ",
            "      |.|| F------7 ||.|      ",
            " F----J.LJ L------J LJ.L----7 ",
            " |............||............| ",
            " |.F--7.F---7.||.F---7.F--7.| ",
            " |.L--|.L---J.LJ.L---J.|--J.| ",
            " |o..||....... X.......||..o| ",
            " |-7.||.F7.F------7.F7.||.F-| ",
            " |-J.LJ.||.L------J.||.LJ.L-| ",
            " |......||....||....||......| ",
            " |.F--------7.||.F--------7.| ",
            " |.L--------J.LJ.L--------J.| ",
            " |..........................| ",
            " L--------------------------J ",
            "                              ",
        ],
    },
    RawLevel {
        color: LevelColor::new(222, 33, 33),
        board: [
            "                              ",
            " F--------------------------7 ",
            " |o...........||...........o| ",
            " |.F--7.F---7.||.F---7.F--7.| ",
            " |.|  |.|   |.||.|   |.|  |.| ",
            " |.L--J.L---J.LJ.L---J.L--J.| ",
            " |..........................| ",
            " |.F--7....F------7....F--7.| ",
            " |.L--J....L------J....L--J.| ",
            " |......F7....||....F7......| ",
            " L----7.|---7 || F---|.F----J ",
            "      |.|---J LJ L---|.|      ",
            "      |.||    b     ||.|      ",
            "      |.|| F--==--7 ||.|      ",
            " -----J.LJ |      | LJ.L----- ",
            "       .   |i p H |   .       ",
            " -----7.F7 |      | F7.F----- ",
            "      |.|| L------J ||.|      ",
            "      |.||          ||.|      ",
            "      |.|| F------7 ||.|      ",
            " F----J.LJ L------J LJ.L----7 ",
            " |..........................| ",
            " |.F--7.F---7.F7.F---7.F--7.| ",
            " |.L--|.L---J.LJ.L---J.|--J.| ",
            " |o..||....... X.......||..o| ",
            " |...||.F7.F------7.F7.||...| ",
            " |...LJ.||.L------J.||.LJ...| ",
            " |......||....||....||......| ",
            " |.F--------7.||.F--------7.| ",
            " |.L--------J.LJ.L--------J.| ",
            " |..........................| ",
            " L--------------------------J ",
            "                              ",
        ],
    },
];
