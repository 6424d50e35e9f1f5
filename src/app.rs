use std::time::Instant;

use glam::IVec2;
use pacman_engine::config::GameConfig;
use pacman_engine::constants::LOOP_TIME;
use pacman_engine::error::GameResult;
use pacman_engine::events::{AudioEvent, GameCommand};
use pacman_engine::game::Game;
use pacman_engine::map::direction::Direction;
use pacman_engine::systems::{FrameSnapshot, GameStage, Session};
use tracing::{debug, info};

/// Frames the autopilot keeps a heading before trying the next one.
const TURN_INTERVAL: u32 = 90;

const ROTATION: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

/// Steers the player without a human at the keys: keeps a heading until blocked, then turns.
#[derive(Default)]
struct Autopilot {
    last_position: Option<IVec2>,
    frames_on_heading: u32,
    turns: usize,
}

impl Autopilot {
    fn steer(&mut self, snapshot: &FrameSnapshot) -> Option<GameCommand> {
        if snapshot.stage != GameStage::Playing {
            self.last_position = None;
            return None;
        }

        let position = snapshot.player.position;
        let stalled = self.last_position == Some(position);
        self.last_position = Some(position);
        self.frames_on_heading += 1;

        if stalled || self.frames_on_heading >= TURN_INTERVAL {
            self.frames_on_heading = 0;
            self.turns += 1;
            return Some(GameCommand::Press(ROTATION[self.turns % ROTATION.len()]));
        }
        None
    }
}

/// Drives a headless game: feeds it autopilot input, answers its audio cues and paces it.
pub struct App {
    game: Game,
    pilot: Autopilot,
    frame_limit: u64,
    realtime: bool,
}

impl App {
    pub fn new(config: GameConfig, frame_limit: u64, realtime: bool) -> GameResult<Self> {
        Ok(Self {
            game: Game::new(config)?,
            pilot: Autopilot::default(),
            frame_limit,
            realtime,
        })
    }

    /// Runs one frame. Returns false once the app should stop.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        if let Some(command) = self.pilot.steer(self.game.snapshot()) {
            self.game.send(command);
        }

        if self.game.tick() {
            return false;
        }

        for cue in self.game.drain_audio() {
            debug!(?cue, "Audio cue");
            // There is no audio device, so every jingle finishes instantly.
            if cue == AudioEvent::PlayerDeath {
                self.game.send(GameCommand::DeathSequenceFinished);
            }
        }

        match self.game.stage() {
            GameStage::Won => {
                info!(score = self.game.session().score, "Level won, advancing");
                self.game.send(GameCommand::Confirm);
            }
            GameStage::Lost => {
                info!(score = self.game.session().score, frame = self.game.frame(), "Game over");
                return false;
            }
            _ => {}
        }

        if self.game.frame() >= self.frame_limit {
            return false;
        }

        if self.realtime {
            if let Some(remaining) = LOOP_TIME.checked_sub(start.elapsed()) {
                spin_sleep::sleep(remaining);
            }
        }
        true
    }

    pub fn session(&self) -> Session {
        self.game.session()
    }

    pub fn frame(&self) -> u64 {
        self.game.frame()
    }
}
