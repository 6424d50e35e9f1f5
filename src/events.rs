use bevy_ecs::prelude::*;

use crate::map::direction::Direction;

/// An already-decoded input command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// Quit the game loop.
    Quit,
    /// A direction key went down.
    Press(Direction),
    /// A direction key went up.
    Release(Direction),
    /// Acknowledge a won or lost game.
    Confirm,
    /// The death jingle finished playing; play may resume.
    DeathSequenceFinished,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Fire-and-forget cues for the audio collaborator.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioEvent {
    PelletEaten,
    PowerPelletEaten,
    GhostEaten,
    /// Play is held in [`crate::systems::GameStage::PlayerDying`] until the collaborator answers
    /// with [`GameCommand::DeathSequenceFinished`].
    PlayerDeath,
    /// A fresh game or a restart after death.
    Intro,
    /// Advancing to the next level.
    Intermission,
}
