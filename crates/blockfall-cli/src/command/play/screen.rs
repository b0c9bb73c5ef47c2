use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use blockfall_engine::{Command, GameConfig, GameDriver, GameStatus, RepeatKey};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::view::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay};

/// A held key with no press or repeat event for this long is treated as released.
///
/// Only used on terminals that never report key releases. Must exceed the initial OS
/// key repeat delay, or a held key stalls until its first OS repeat.
const KEY_RELEASE_TIMEOUT: Duration = Duration::from_millis(500);

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑", "X"], "Rotate"),
    (&["Space"], "Hard Drop"),
    (&["C"], "Hold"),
    (&["P"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["R"], "Restart"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Action {
    Repeat(RepeatKey),
    Command(Command),
    Quit,
}

fn key_action(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match code {
        KeyCode::Left => Action::Repeat(RepeatKey::Left),
        KeyCode::Right => Action::Repeat(RepeatKey::Right),
        KeyCode::Down => Action::Repeat(RepeatKey::Down),
        KeyCode::Up | KeyCode::Char('x' | 'X') => Action::Command(Command::Rotate),
        KeyCode::Char(' ') => Action::Command(Command::HardDrop),
        KeyCode::Char('c' | 'C') => Action::Command(Command::Hold),
        KeyCode::Char('p' | 'P') => Action::Command(Command::TogglePause),
        KeyCode::Char('r' | 'R') => Action::Command(Command::Restart),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// End-of-session numbers reported after the terminal is restored.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub status: GameStatus,
    pub score: u64,
    pub level: u64,
    pub lines: u64,
    pub pieces: u64,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct PlayScreen {
    driver: GameDriver,
    /// Last press or repeat event of each held key.
    ///
    /// Command keys are only tracked when the terminal does not report releases.
    last_seen: HashMap<Action, Instant>,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        Ok(Self {
            driver: GameDriver::new(config)?,
            last_seen: HashMap::new(),
            is_exiting: false,
        })
    }

    pub fn should_exit(&self) -> bool {
        self.is_exiting
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let view = self.driver.game().render();
        let game_display = GameDisplay::new(&view, self.driver.elapsed());
        let bindings = match view.status {
            GameStatus::Playing => PLAYING_KEYS,
            GameStatus::Paused => PAUSED_KEYS,
            GameStatus::GameOver => GAME_OVER_KEYS,
        };
        let rows = u16::try_from(view.cells.height()).unwrap_or(u16::MAX);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(rows + 2), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    /// Handles a key press, repeat or release, or a focus change.
    ///
    /// OS key repeat never reaches the game: command keys act once per press, and
    /// without release events a press of a key seen within [`KEY_RELEASE_TIMEOUT`]
    /// counts as a repeat.
    pub fn handle_event(&mut self, event: &Event, now: Instant, key_releases: bool) {
        if matches!(event, Event::FocusLost) {
            // Releases that happen while unfocused are never reported.
            self.last_seen.clear();
            self.driver.release_all();
            return;
        }
        let Some(event) = event.as_key_event() else {
            return;
        };
        let Some(action) = key_action(event.code, event.modifiers) else {
            return;
        };

        match (action, event.kind) {
            (Action::Repeat(key), KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.last_seen.insert(action, now);
                self.driver.press(key);
            }
            (Action::Repeat(key), KeyEventKind::Release) => {
                self.last_seen.remove(&action);
                self.driver.release(key);
            }
            (Action::Command(command), KeyEventKind::Press) => {
                if !key_releases {
                    let repeated = self
                        .last_seen
                        .insert(action, now)
                        .is_some_and(|seen| now.duration_since(seen) <= KEY_RELEASE_TIMEOUT);
                    if repeated {
                        return;
                    }
                }
                self.driver.dispatch(command);
                if command.is_restart() {
                    self.last_seen
                        .retain(|action, _| !matches!(action, Action::Repeat(_)));
                }
            }
            (Action::Quit, KeyEventKind::Press) => self.is_exiting = true,
            _ => {}
        }
    }

    /// Advances the game by one frame.
    ///
    /// Without release events from the terminal, keys that went quiet are released first.
    pub fn update(&mut self, now: Instant, key_releases: bool) {
        if !key_releases {
            let expired: Vec<_> = self
                .last_seen
                .iter()
                .filter(|(_, seen)| now.duration_since(**seen) > KEY_RELEASE_TIMEOUT)
                .map(|(action, _)| *action)
                .collect();
            for action in expired {
                self.last_seen.remove(&action);
                if let Action::Repeat(key) = action {
                    self.driver.release(key);
                }
            }
        }
        self.driver.tick();
    }

    /// Stops every timer and reports the session.
    pub fn finish(mut self) -> SessionSummary {
        self.driver.cancel_timers();
        let game = self.driver.game();
        let stats = game.stats();
        SessionSummary {
            status: game.status(),
            score: stats.score(),
            level: stats.level(),
            lines: stats.lines(),
            pieces: stats.locked_pieces(),
            elapsed: self.driver.elapsed(),
        }
    }
}
