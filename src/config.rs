use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Runtime tunables for a game session.
///
/// Defaults match the arcade timings at 60 frames per second. Every field can be overridden
/// through a `PACMAN_`-prefixed environment variable, e.g. `PACMAN_PLAYER_SPEED=5`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation frames per second.
    pub fps: u32,
    /// Pixels the player advances per frame.
    pub player_speed: u32,
    /// Pixels a ghost advances per frame.
    pub ghost_speed: u32,
    /// How much slower frightened ghosts move (never below one pixel per frame).
    pub frightened_slowdown: u32,
    /// Length of a power-up window, in seconds.
    pub power_up_seconds: u32,
    /// Length of the pause before play starts, in seconds.
    pub intro_seconds: u32,
    pub starting_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            player_speed: 4,
            ghost_speed: 3,
            frightened_slowdown: 2,
            power_up_seconds: 8,
            intro_seconds: 5,
            starting_lives: 3,
        }
    }
}

impl GameConfig {
    /// Loads the configuration from defaults merged with `PACMAN_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::from(Serialized::defaults(GameConfig::default())).merge(Env::prefixed("PACMAN_")))
    }

    /// Extracts and validates a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: GameConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("fps", self.fps),
            ("player_speed", self.player_speed),
            ("ghost_speed", self.ghost_speed),
            ("power_up_seconds", self.power_up_seconds),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let durations = [
            ("power_up_seconds", self.power_up_seconds),
            ("intro_seconds", self.intro_seconds),
        ];
        for (field, seconds) in durations {
            if self.fps.checked_mul(seconds).is_none() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{seconds} seconds at {} fps overflows the frame counter", self.fps),
                });
            }
        }
        Ok(())
    }

    /// Frames a power-up lasts.
    pub fn power_up_ticks(&self) -> u32 {
        self.fps * self.power_up_seconds
    }

    /// Frames the pre-play pause lasts.
    pub fn intro_ticks(&self) -> u32 {
        self.fps * self.intro_seconds
    }

    /// Ghost speed while a power-up is active.
    pub fn frightened_speed(&self) -> u32 {
        self.ghost_speed.saturating_sub(self.frightened_slowdown).max(1)
    }
}
