use std::collections::VecDeque;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::IVec2;
use strum_macros::{AsRefStr, EnumIter};

use crate::{
    constants::SCATTER_CORNERS,
    map::{direction::Direction, parser::StartPositions},
    systems::{
        movement::{Position, Velocity},
        pathfinding::Heuristic,
    },
};

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// The direction the player most recently asked for. Adopted as soon as it becomes valid.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestedDirection(pub Direction);

/// Which of the four ghosts an entity is. Declaration order is the order collisions are resolved in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Ghost {
    Blinky,
    Inky,
    Pinky,
    Clyde,
}

impl Ghost {
    pub const fn strategy(self) -> GhostStrategy {
        match self {
            Ghost::Blinky => GhostStrategy::Direct,
            Ghost::Inky => GhostStrategy::Midpoint,
            Ghost::Pinky => GhostStrategy::Ambush,
            Ghost::Clyde => GhostStrategy::Greedy,
        }
    }

    /// The corner cell this ghost flees to while frightened.
    pub const fn scatter_corner(self) -> IVec2 {
        SCATTER_CORNERS[self as usize]
    }

    /// The cell this ghost starts each life in.
    pub fn spawn_tile(self, starts: &StartPositions) -> IVec2 {
        match self {
            Ghost::Blinky => starts.blinky,
            Ghost::Inky => starts.inky,
            Ghost::Pinky => starts.pinky,
            Ghost::Clyde => starts.home,
        }
    }
}

/// How a ghost picks its chase target and moves toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostStrategy {
    /// Aims at the player. A* with the euclidean heuristic.
    Direct,
    /// Aims halfway between the direct chaser and the player.
    Midpoint,
    /// Aims a few cells ahead of the player.
    Ambush,
    /// No search: steps greedily toward the player, falling back to A* only when eaten.
    Greedy,
}

impl GhostStrategy {
    pub const fn heuristic(self) -> Heuristic {
        match self {
            GhostStrategy::Direct => Heuristic::Euclidean,
            _ => Heuristic::Manhattan,
        }
    }
}

/// Behavioral state of a ghost.
///
/// `Bitten` ghosts have already been eaten once in the current power-up window; they chase
/// normally and are lethal again. `Eaten { bitten }` remembers whether the eat happened in the
/// current window so the ghost comes back in the right state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GhostState {
    #[default]
    Normal,
    Frightened,
    Bitten,
    Eaten {
        bitten: bool,
    },
}

impl GhostState {
    pub fn is_eaten(self) -> bool {
        matches!(self, GhostState::Eaten { .. })
    }

    /// Whether touching the player eats this ghost.
    pub fn is_edible(self) -> bool {
        matches!(self, GhostState::Frightened)
    }

    /// Whether touching the player kills the player.
    pub fn is_threat(self) -> bool {
        matches!(self, GhostState::Normal | GhostState::Bitten)
    }

    /// A power pellet was eaten: every live ghost becomes edible again.
    pub fn frighten(&mut self) {
        *self = match *self {
            GhostState::Eaten { .. } => GhostState::Eaten { bitten: false },
            _ => GhostState::Frightened,
        };
    }

    /// The power-up ran out. Eaten ghosts keep heading home.
    pub fn calm(&mut self) {
        *self = match *self {
            GhostState::Eaten { .. } => GhostState::Eaten { bitten: false },
            _ => GhostState::Normal,
        };
    }

    /// The player ate this ghost. Returns false if it was not edible.
    pub fn eat(&mut self) -> bool {
        if !self.is_edible() {
            return false;
        }
        *self = GhostState::Eaten { bitten: true };
        true
    }

    /// An eaten ghost reached home.
    pub fn revive(&mut self, power_active: bool) {
        if let GhostState::Eaten { bitten } = *self {
            *self = match (power_active, bitten) {
                (false, _) => GhostState::Normal,
                (true, true) => GhostState::Bitten,
                (true, false) => GhostState::Frightened,
            };
        }
    }

    pub fn visual(self) -> GhostVisual {
        match self {
            GhostState::Normal => GhostVisual::Normal,
            GhostState::Frightened => GhostVisual::Flee,
            GhostState::Bitten => GhostVisual::Bitten,
            GhostState::Eaten { .. } => GhostVisual::Eaten,
        }
    }
}

/// What a renderer should draw for a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostVisual {
    Normal,
    Flee,
    Bitten,
    Eaten,
}

/// The point a ghost is heading for, in pixels. Not necessarily a cell center.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Target(pub IVec2);

/// Cells still to visit, front first. Consumed one cell at a time.
#[derive(Component, Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(pub VecDeque<IVec2>);

/// A resource for tracking whether the game loop should keep running.
#[derive(Resource, Debug, Default)]
pub struct GlobalState {
    pub exit: bool,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub velocity: Velocity,
    pub requested: RequestedDirection,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub state: GhostState,
    pub position: Position,
    pub velocity: Velocity,
    pub target: Target,
    pub path: Path,
}
