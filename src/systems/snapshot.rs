//! The read-only view of a frame handed to renderers.

use bevy_ecs::{
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::IVec2;
use smallvec::SmallVec;

use crate::{
    config::GameConfig,
    map::{
        direction::Direction,
        grid::{Pellet, TileGrid},
        level::LevelColor,
    },
    systems::{
        components::{Ghost, GhostState, GhostVisual, PlayerControlled},
        movement::{Position, Velocity},
        state::{AnimationCounter, CurrentLevel, GameStage, PowerUp, Session},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerSnapshot {
    /// Top-left corner of the sprite.
    pub position: IVec2,
    pub facing: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostSnapshot {
    pub ghost: Ghost,
    /// Top-left corner of the sprite.
    pub position: IVec2,
    pub facing: Direction,
    pub visual: GhostVisual,
}

/// Everything a renderer needs to draw a frame.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub stage: GameStage,
    pub score: u32,
    pub lives: u32,
    pub level: usize,
    pub color: LevelColor,
    pub animation_tick: u32,
    /// Power pellets blink; false on the frames they are hidden.
    pub power_pellets_visible: bool,
    pub power_up_active: bool,
    pub player: PlayerSnapshot,
    /// Ordered Blinky, Inky, Pinky, Clyde.
    pub ghosts: SmallVec<[GhostSnapshot; 4]>,
    pub pellets: Vec<(IVec2, Pellet)>,
}

impl FrameSnapshot {
    /// A blank view for `stage`, used until the first frame has been captured.
    pub fn empty(stage: GameStage) -> Self {
        Self {
            stage,
            score: 0,
            lives: 0,
            level: 0,
            color: LevelColor::default(),
            animation_tick: 0,
            power_pellets_visible: true,
            power_up_active: false,
            player: PlayerSnapshot::default(),
            ghosts: SmallVec::new(),
            pellets: Vec::new(),
        }
    }
}

/// Captures the state the previous frame left behind, before anything moves this frame.
#[allow(clippy::too_many_arguments)]
pub fn snapshot_system(
    config: Res<GameConfig>,
    stage: Res<GameStage>,
    session: Res<Session>,
    level: Res<CurrentLevel>,
    power: Res<PowerUp>,
    counter: Res<AnimationCounter>,
    grid: Res<TileGrid>,
    players: Query<(&Position, &Velocity), (With<PlayerControlled>, Without<Ghost>)>,
    ghosts: Query<(&Ghost, &GhostState, &Position, &Velocity), Without<PlayerControlled>>,
    mut snapshot: ResMut<FrameSnapshot>,
) {
    let player = players
        .single()
        .map(|(position, velocity)| PlayerSnapshot {
            position: position.render_position(),
            facing: velocity.direction,
        })
        .unwrap_or_default();

    let mut ghost_snapshots: SmallVec<[GhostSnapshot; 4]> = ghosts
        .iter()
        .map(|(ghost, state, position, velocity)| GhostSnapshot {
            ghost: *ghost,
            position: position.render_position(),
            facing: velocity.direction,
            visual: state.visual(),
        })
        .collect();
    ghost_snapshots.sort_by_key(|snapshot| snapshot.ghost);

    *snapshot = FrameSnapshot {
        stage: *stage,
        score: session.score,
        lives: session.lives,
        level: level.index,
        color: level.color,
        animation_tick: counter.0,
        power_pellets_visible: counter.power_pellets_visible(&config),
        power_up_active: power.active,
        player,
        ghosts: ghost_snapshots,
        pellets: grid.pellets().collect(),
    };
}
