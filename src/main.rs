use std::env;

use anyhow::{Context, Result};
use pacman_engine::config::GameConfig;
use pacman_engine::constants::LOOP_TIME;
use pacman_engine::logging::setup_logging;
use thousands::Separable;
use tracing::info;

use crate::app::App;

mod app;

/// About five minutes of play at 60 frames per second.
const DEFAULT_FRAME_LIMIT: u64 = 18_000;

pub fn main() -> Result<()> {
    setup_logging();

    let args: Vec<String> = env::args().collect();
    let realtime = args.iter().any(|arg| arg == "--realtime" || arg == "-r");
    let frame_limit = args
        .iter()
        .position(|arg| arg == "--frames")
        .and_then(|index| args.get(index + 1))
        .map(|value| value.parse::<u64>())
        .transpose()
        .context("--frames expects a whole number")?
        .unwrap_or(DEFAULT_FRAME_LIMIT);

    let config = GameConfig::load().context("Could not load configuration")?;
    let mut app = App::new(config, frame_limit, realtime).context("Could not create game")?;

    info!(loop_time = ?LOOP_TIME, frame_limit, realtime, "Starting game loop");
    while app.run() {}

    let session = app.session();
    println!(
        "Final score: {} ({} lives left after {} frames)",
        session.score.separate_with_commas(),
        session.lives,
        app.frame().separate_with_commas()
    );
    Ok(())
}
