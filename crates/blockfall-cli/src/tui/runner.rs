use std::{io, time::Duration};

use anyhow::Context as _;
use crossterm::{
    event::{
        DisableFocusChange, EnableFocusChange, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Owns the event loop and runs an [`App`] inside a ratatui terminal.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    request_key_releases: bool,
    key_releases: bool,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Asks the terminal to report key release and repeat events.
    ///
    /// Takes effect in [`Self::run`] and only on terminals that support the keyboard
    /// enhancement protocol.
    pub fn request_key_releases(&mut self) {
        self.request_key_releases = true;
    }

    /// Whether the terminal reports key releases.
    pub fn key_releases(&self) -> bool {
        self.key_releases
    }

    /// Runs the application until `app.should_exit()`.
    ///
    /// 1. Calls `app.init()`
    /// 2. Dispatches events:
    ///    - `Tick`: calls `app.update()`
    ///    - `Render`: calls `app.draw()`
    ///    - `Crossterm`: calls `app.handle_event()`, focus changes included
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            execute!(io::stdout(), EnableFocusChange).context("Failed to enable focus events")?;
            if self.request_key_releases {
                self.key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
            }
            if self.key_releases {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(
                        KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                            | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    )
                )
                .context("Failed to enable keyboard enhancement")?;
            }

            let result = self.event_loop(app, terminal);

            if self.key_releases {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)
                    .context("Failed to restore keyboard mode")?;
            }
            execute!(io::stdout(), DisableFocusChange).context("Failed to disable focus events")?;
            result
        })
    }

    fn event_loop<A>(&mut self, app: &mut A, terminal: &mut ratatui::DefaultTerminal) -> anyhow::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => app.update(self),
                TuiEvent::Render => {
                    terminal
                        .draw(|f| app.draw(f))
                        .context("Failed to draw frame")?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}
