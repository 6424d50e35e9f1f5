use bitflags::bitflags;
use glam::IVec2;
use strum_macros::AsRefStr;

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the direction as a unit IVec2 in screen space (y grows downwards).
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Whether this direction moves along the x axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

bitflags! {
    /// The set of directions an agent may currently step in.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DirectionFlags: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl DirectionFlags {
    /// Returns true if stepping in `direction` is allowed.
    pub fn allows(self, direction: Direction) -> bool {
        self.contains(direction.into())
    }
}

impl From<Direction> for DirectionFlags {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => DirectionFlags::UP,
            Direction::Down => DirectionFlags::DOWN,
            Direction::Left => DirectionFlags::LEFT,
            Direction::Right => DirectionFlags::RIGHT,
        }
    }
}
