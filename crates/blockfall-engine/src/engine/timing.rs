//! Timing Controller.
//!
//! Time is counted in frames of 1/60 s. Two kinds of timer drive the game:
//!
//! - [`GravityTimer`] - periodic soft drop whose period depends on the level
//! - [`AutoRepeat`] - per-key repeat of held movement keys at a fixed rate
//!
//! Both are explicit, cancelable resources. Nothing here touches a clock; the caller
//! advances them one frame at a time.

use std::time::Duration;

use arrayvec::ArrayVec;

use super::game::Command;

/// Frames per second of the frame clock.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Auto-repeat period of held movement keys (100 ms), independent of level.
pub const REPEAT_INTERVAL_FRAMES: u32 = 6;

/// Frames between gravity steps for levels 0 through 9.
const GRAVITY_TABLE: [u32; 10] = [48, 43, 38, 33, 28, 23, 18, 13, 8, 6];

/// Frames between gravity steps at `level`.
///
/// Non-increasing in `level`: 48 at level 0 down to 6 at level 9, then 5 (10-12),
/// 4 (13-15), 3 (16-18), 2 (19-28) and 1 from level 29 on.
#[must_use]
pub fn gravity_frames(level: u64) -> u32 {
    match level {
        0..=9 => GRAVITY_TABLE[usize::try_from(level).unwrap_or_default()],
        10..=12 => 5,
        13..=15 => 4,
        16..=18 => 3,
        19..=28 => 2,
        _ => 1,
    }
}

/// Wall-clock length of `frames`.
#[must_use]
pub fn frames_to_duration(frames: u64) -> Duration {
    const NANOS_PER_SEC: u64 = 1_000_000_000;
    let fps = u64::from(FRAMES_PER_SECOND);
    let secs = frames / fps;
    let nanos = (frames % fps) * NANOS_PER_SEC / fps;
    // `nanos` is below one second, so it always fits.
    Duration::new(secs, u32::try_from(nanos).unwrap_or_default())
}

/// Periodic gravity timer.
///
/// While armed, [`Self::tick`] fires once every `period` frames. Rescheduling cancels
/// the pending countdown and starts a new one with the period for the new level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravityTimer {
    period: u32,
    remaining: Option<u32>,
}

impl GravityTimer {
    /// Creates an armed timer for `level`.
    #[must_use]
    pub fn start(level: u64) -> Self {
        let period = gravity_frames(level);
        Self {
            period,
            remaining: Some(period),
        }
    }

    #[must_use]
    pub fn period(&self) -> u32 {
        self.period
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Cancels and restarts the countdown with the period for `level`.
    pub fn reschedule(&mut self, level: u64) {
        *self = Self::start(level);
    }

    /// Stops the timer. Idempotent.
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Advances one frame and returns whether gravity fires on this frame.
    pub fn tick(&mut self) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining -= 1;
        if *remaining == 0 {
            *remaining = self.period;
            return true;
        }
        false
    }
}

/// Movement keys that auto-repeat while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatKey {
    Left,
    Right,
    Down,
}

impl RepeatKey {
    const ALL: [RepeatKey; 3] = [RepeatKey::Left, RepeatKey::Right, RepeatKey::Down];

    /// The command issued on press and on every repeat.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            RepeatKey::Left => Command::MoveLeft,
            RepeatKey::Right => Command::MoveRight,
            RepeatKey::Down => Command::MoveDown,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Auto-repeat timers for held movement keys, one per key.
///
/// - A genuine press issues the key's command at once and arms its repeat timer.
/// - A press of a key that is already held issues nothing (OS key repeat).
/// - Pressing left cancels a held right and vice versa; down is independent.
/// - Releasing a key cancels only that key's timer.
///
/// # Example
///
/// ```
/// use blockfall_engine::{AutoRepeat, Command, RepeatKey, REPEAT_INTERVAL_FRAMES};
///
/// let mut repeat = AutoRepeat::new();
/// assert_eq!(repeat.press(RepeatKey::Left), Some(Command::MoveLeft));
/// assert_eq!(repeat.press(RepeatKey::Left), None);
///
/// let fired: Vec<_> = (0..REPEAT_INTERVAL_FRAMES).flat_map(|_| repeat.tick()).collect();
/// assert_eq!(fired, [Command::MoveLeft]);
///
/// repeat.release(RepeatKey::Left);
/// assert!(repeat.tick().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoRepeat {
    remaining: [Option<u32>; 3],
}

impl AutoRepeat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_held(&self, key: RepeatKey) -> bool {
        self.remaining[key.index()].is_some()
    }

    /// Registers a key press and returns the command to issue now, if any.
    pub fn press(&mut self, key: RepeatKey) -> Option<Command> {
        if self.is_held(key) {
            return None;
        }
        match key {
            RepeatKey::Left => self.release(RepeatKey::Right),
            RepeatKey::Right => self.release(RepeatKey::Left),
            RepeatKey::Down => {}
        }
        self.remaining[key.index()] = Some(REPEAT_INTERVAL_FRAMES);
        Some(key.command())
    }

    /// Cancels the repeat timer of `key`. Idempotent.
    pub fn release(&mut self, key: RepeatKey) {
        self.remaining[key.index()] = None;
    }

    /// Cancels every repeat timer. Idempotent.
    pub fn cancel_all(&mut self) {
        self.remaining = [None; 3];
    }

    /// Advances one frame and returns the repeat commands due on this frame.
    pub fn tick(&mut self) -> ArrayVec<Command, 3> {
        let mut fired = ArrayVec::new();
        for key in RepeatKey::ALL {
            let Some(remaining) = self.remaining[key.index()].as_mut() else {
                continue;
            };
            *remaining -= 1;
            if *remaining == 0 {
                *remaining = REPEAT_INTERVAL_FRAMES;
                fired.push(key.command());
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_table() {
        let expected = [
            (0, 48),
            (1, 43),
            (2, 38),
            (3, 33),
            (4, 28),
            (5, 23),
            (6, 18),
            (7, 13),
            (8, 8),
            (9, 6),
            (10, 5),
            (12, 5),
            (13, 4),
            (15, 4),
            (16, 3),
            (18, 3),
            (19, 2),
            (28, 2),
            (29, 1),
            (1000, 1),
        ];
        for (level, frames) in expected {
            assert_eq!(gravity_frames(level), frames, "level {level}");
        }
    }

    #[test]
    fn test_gravity_is_non_increasing() {
        for level in 0..60 {
            assert!(gravity_frames(level + 1) <= gravity_frames(level), "level {level}");
        }
    }

    #[test]
    fn test_frames_to_duration() {
        assert_eq!(frames_to_duration(0), Duration::ZERO);
        assert_eq!(frames_to_duration(60), Duration::from_secs(1));
        assert_eq!(frames_to_duration(90), Duration::from_millis(1500));
    }

    mod gravity_timer {
        use super::*;

        #[test]
        fn test_fires_every_period() {
            let mut timer = GravityTimer::start(0);
            let fired: Vec<_> = (1..=150).filter(|_| timer.tick()).collect();
            assert_eq!(fired, [48, 96, 144]);
        }

        #[test]
        fn test_reschedule_restarts_countdown() {
            let mut timer = GravityTimer::start(0);
            for _ in 0..40 {
                assert!(!timer.tick());
            }
            timer.reschedule(9);
            assert_eq!(timer.period(), 6);
            let fired: Vec<_> = (1..=12).filter(|_| timer.tick()).collect();
            assert_eq!(fired, [6, 12]);
        }

        #[test]
        fn test_cancel_is_idempotent() {
            let mut timer = GravityTimer::start(29);
            timer.cancel();
            timer.cancel();
            assert!(!timer.is_armed());
            assert!((0..10).all(|_| !timer.tick()));
        }
    }

    mod auto_repeat {
        use super::*;

        fn run(repeat: &mut AutoRepeat, frames: u32) -> Vec<Command> {
            (0..frames).flat_map(|_| repeat.tick()).collect()
        }

        #[test]
        fn test_repeats_until_release() {
            let mut repeat = AutoRepeat::new();
            assert_eq!(repeat.press(RepeatKey::Down), Some(Command::MoveDown));
            assert_eq!(run(&mut repeat, 3 * REPEAT_INTERVAL_FRAMES).len(), 3);
            repeat.release(RepeatKey::Down);
            assert!(run(&mut repeat, 30).is_empty());
        }

        #[test]
        fn test_opposite_horizontal_press_cancels() {
            let mut repeat = AutoRepeat::new();
            repeat.press(RepeatKey::Left);
            assert_eq!(repeat.press(RepeatKey::Right), Some(Command::MoveRight));
            assert!(!repeat.is_held(RepeatKey::Left));
            assert_eq!(
                run(&mut repeat, REPEAT_INTERVAL_FRAMES),
                [Command::MoveRight]
            );
        }

        #[test]
        fn test_release_only_cancels_own_key() {
            let mut repeat = AutoRepeat::new();
            repeat.press(RepeatKey::Left);
            repeat.press(RepeatKey::Down);
            repeat.release(RepeatKey::Down);
            repeat.release(RepeatKey::Right);
            assert!(repeat.is_held(RepeatKey::Left));
            assert_eq!(run(&mut repeat, REPEAT_INTERVAL_FRAMES), [Command::MoveLeft]);
        }

        #[test]
        fn test_horizontal_and_down_repeat_together() {
            let mut repeat = AutoRepeat::new();
            repeat.press(RepeatKey::Right);
            repeat.press(RepeatKey::Down);
            assert_eq!(
                run(&mut repeat, REPEAT_INTERVAL_FRAMES),
                [Command::MoveRight, Command::MoveDown]
            );
        }

        #[test]
        fn test_cancel_all() {
            let mut repeat = AutoRepeat::new();
            repeat.press(RepeatKey::Left);
            repeat.press(RepeatKey::Down);
            repeat.cancel_all();
            repeat.cancel_all();
            assert_eq!(repeat, AutoRepeat::new());
            // A key pressed again after cancellation is a genuine press.
            assert_eq!(repeat.press(RepeatKey::Left), Some(Command::MoveLeft));
        }
    }
}
