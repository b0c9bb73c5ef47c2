use std::time::Instant;

use blockfall_engine::{FRAMES_PER_SECOND, GameConfig};
use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::screen::{PlayScreen, SessionSummary},
    tui::{App, RenderMode, Tui},
};

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        Ok(Self {
            screen: PlayScreen::new(config)?,
        })
    }

    pub fn finish(self) -> SessionSummary {
        self.screen.finish()
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        let fps = f64::from(FRAMES_PER_SECOND);
        tui.set_tick_rate(fps);
        tui.set_render_mode(RenderMode::from_rate(fps));
        tui.request_key_releases();
    }

    fn should_exit(&self) -> bool {
        self.screen.should_exit()
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        self.screen
            .handle_event(&event, Instant::now(), tui.key_releases());
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, tui: &mut Tui) {
        self.screen.update(Instant::now(), tui.key_releases());
    }
}
