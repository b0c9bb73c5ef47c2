use std::time::Duration;

use super::{
    config::{ConfigError, GameConfig},
    game::{Command, Game, LockEvent},
    timing::{AutoRepeat, GravityTimer, RepeatKey, frames_to_duration},
};

/// Drives a [`Game`] from a frame clock and key events.
///
/// Owns the gravity timer and the auto-repeat timers and feeds the commands they
/// produce into the game, one frame at a time:
///
/// - Timers only run while the game is playing; pausing freezes them.
/// - The gravity period follows the level, rescheduled whenever the level changes.
/// - Every timer is cancelled when the game ends and re-armed on restart.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GameDriver, PieceSeed, gravity_frames};
///
/// let config = GameConfig::default().with_seed(PieceSeed::from_u128(1));
/// let mut driver = GameDriver::new(config).unwrap();
/// let y = driver.game().active().y();
/// for _ in 0..gravity_frames(0) {
///     driver.tick();
/// }
/// assert_eq!(driver.game().active().y(), y + 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameDriver {
    game: Game,
    gravity: GravityTimer,
    repeat: AutoRepeat,
    played_frames: u64,
}

impl GameDriver {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_game(Game::new(config)?))
    }

    /// Drives an existing game, starting the gravity timer for its level.
    #[must_use]
    pub fn from_game(game: Game) -> Self {
        let mut driver = Self {
            gravity: GravityTimer::start(game.stats().level()),
            game,
            repeat: AutoRepeat::new(),
            played_frames: 0,
        };
        if driver.game.status().is_game_over() {
            driver.cancel_timers();
        }
        driver
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn gravity(&self) -> &GravityTimer {
        &self.gravity
    }

    /// Time spent playing, excluding pauses and time after the game ended.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        frames_to_duration(self.played_frames)
    }

    /// Applies a command and updates the timers to match the new state.
    pub fn dispatch(&mut self, command: Command) -> Option<LockEvent> {
        let level = self.game.stats().level();
        let (game, lock) = self.game.step(command);
        self.game = game;

        if command.is_restart() {
            self.repeat.cancel_all();
            self.gravity.reschedule(self.game.stats().level());
            self.played_frames = 0;
        } else if self.game.status().is_game_over() {
            self.cancel_timers();
        } else if self.game.stats().level() != level {
            self.gravity.reschedule(self.game.stats().level());
        }
        lock
    }

    /// A movement key went down: issues its command unless the key is already held.
    pub fn press(&mut self, key: RepeatKey) -> Option<LockEvent> {
        if self.game.status().is_game_over() {
            return None;
        }
        let command = self.repeat.press(key)?;
        self.dispatch(command)
    }

    pub fn release(&mut self, key: RepeatKey) {
        self.repeat.release(key);
    }

    /// Releases every held movement key.
    pub fn release_all(&mut self) {
        self.repeat.cancel_all();
    }

    /// Advances one frame, firing due repeats and gravity.
    ///
    /// Returns the locks that happened during the frame.
    pub fn tick(&mut self) -> Vec<LockEvent> {
        let mut locks = vec![];
        if !self.game.status().is_playing() {
            return locks;
        }
        self.played_frames += 1;

        for command in self.repeat.tick() {
            locks.extend(self.dispatch(command));
            if !self.game.status().is_playing() {
                return locks;
            }
        }
        if self.gravity.tick() {
            locks.extend(self.dispatch(Command::MoveDown));
        }
        locks
    }

    /// Cancels gravity and every key repeat. Idempotent.
    pub fn cancel_timers(&mut self) {
        self.gravity.cancel();
        self.repeat.cancel_all();
    }
}
