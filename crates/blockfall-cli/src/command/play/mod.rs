use blockfall_engine::GameStatus;

use crate::{
    command::{config::ConfigArg, play::app::PlayApp},
    tui::Tui,
    util,
};

mod app;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.config.resolve()?;
    let mut app = PlayApp::new(config)?;

    Tui::new().run(&mut app)?;

    let summary = app.finish();
    let outcome = match summary.status {
        GameStatus::GameOver => "Game over",
        GameStatus::Playing | GameStatus::Paused => "Quit",
    };
    eprintln!(
        "{outcome}: score {}, level {}, lines {}, pieces {}, time {}",
        summary.score,
        summary.level,
        summary.lines,
        summary.pieces,
        util::format_duration(summary.elapsed)
    );
    Ok(())
}
