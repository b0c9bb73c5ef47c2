use serde::{Deserialize, Serialize};

/// Base points for clearing 0-4 lines with a single lock, before the level multiplier.
const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];

/// Lines needed per level.
pub const LINES_PER_LEVEL: u64 = 10;

/// Points for clearing `cleared_lines` rows at `level`.
///
/// `base × (level + 1)` with base 40 / 100 / 300 / 1200 for 1-4 lines. Clearing no
/// lines scores nothing.
///
/// # Example
///
/// ```
/// use blockfall_engine::score_delta;
///
/// assert_eq!(score_delta(1, 0), 40);
/// assert_eq!(score_delta(4, 2), 3600);
/// assert_eq!(score_delta(0, 9), 0);
/// ```
#[must_use]
pub fn score_delta(cleared_lines: usize, level: u64) -> u64 {
    let base = SCORE_TABLE
        .get(cleared_lines)
        .copied()
        .unwrap_or(SCORE_TABLE[SCORE_TABLE.len() - 1]);
    base * (level + 1)
}

/// Score, cleared lines and the derived level.
///
/// Besides the three values shown to the player, it keeps:
///
/// - **Locked pieces**: number of pieces frozen into the grid
/// - **Line clear distribution**: number of locks that cleared 0, 1, 2, 3 and 4 lines
///
/// The level is never stored; it is always `lines / 10`.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.record_lock(4), 1200);
/// for _ in 0..6 {
///     stats.record_lock(1);
/// }
///
/// assert_eq!(stats.lines(), 10);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.score(), 1200 + 6 * 40);
/// assert_eq!(stats.line_clear_counter()[1], 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    lines: u64,
    locked_pieces: u64,
    line_clear_counter: [u64; 5],
}

impl GameStats {
    /// Creates statistics with every counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            locked_pieces: 0,
            line_clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Total cleared lines.
    #[must_use]
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Current level, `lines / 10`.
    #[must_use]
    pub const fn level(&self) -> u64 {
        self.lines / LINES_PER_LEVEL
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> u64 {
        self.locked_pieces
    }

    /// Locks by number of lines cleared: `[none, single, double, triple, tetris]`.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[u64; 5] {
        &self.line_clear_counter
    }

    /// Applies one lock event and returns the points it scored.
    ///
    /// Points use the level in effect before the lines are added.
    pub fn record_lock(&mut self, cleared_lines: usize) -> u64 {
        let delta = score_delta(cleared_lines, self.level());
        self.score += delta;
        self.lines += cleared_lines as u64;
        self.locked_pieces += 1;
        if let Some(count) = self.line_clear_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        delta
    }
}
