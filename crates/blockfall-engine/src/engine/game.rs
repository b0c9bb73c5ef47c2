use rand::Rng as _;

use crate::{ActivePiece, Grid, Shape};

use super::{
    config::{ConfigError, GameConfig},
    lookahead::LookaheadQueue,
    piece_factory::{PieceFactory, PieceSeed},
    scoring::GameStats,
};

/// Player and timer commands accepted by [`Game::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Soft drop or gravity step; locks the piece when it cannot fall.
    MoveDown,
    /// Rotate 90° clockwise, trying kicks of +1 and -1 columns.
    Rotate,
    /// Drop to the resting row and lock at once.
    HardDrop,
    Hold,
    /// Pause or resume. Has no effect once the game is over.
    TogglePause,
    /// Start a new game, whatever the current state.
    Restart,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFlags {
    game_over: bool,
    game_paused: bool,
}

impl GameFlags {
    /// Set when a freshly spawned piece collides; cleared only by restart.
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        self.game_over
    }

    /// Meaningful only while the game is not over.
    #[must_use]
    pub const fn is_paused(self) -> bool {
        self.game_paused
    }
}

/// Folded view of [`GameFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

/// The hold slot and its once-per-piece availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldSlot {
    held: Option<Shape>,
    available: bool,
}

impl Default for HoldSlot {
    fn default() -> Self {
        Self {
            held: None,
            available: true,
        }
    }
}

impl HoldSlot {
    /// The held piece, always in its base orientation.
    #[must_use]
    pub const fn held(&self) -> Option<&Shape> {
        self.held.as_ref()
    }

    /// Whether hold may still be used by the current piece.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }
}

/// Outcome of a lock, reported by [`Game::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub cleared_lines: usize,
    pub score_delta: u64,
    /// Level after the lines were added.
    pub level: u64,
    /// The next piece could not spawn.
    pub topped_out: bool,
}

/// Immutable game snapshot: the Game State Machine.
///
/// Every command is a pure transform from one snapshot to the next. Rejected commands
/// (collisions, commands while paused or over, hold already used) return a snapshot
/// equal to the input; no command is an error.
///
/// The piece generator state is part of the snapshot, so applying the same command
/// to the same snapshot always yields the same result.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, Game, GameConfig};
///
/// let game = Game::new(GameConfig::default()).unwrap();
/// let moved = game.apply(Command::MoveLeft);
/// assert_eq!(moved.active().x(), game.active().x() - 1);
///
/// let (after_drop, lock) = moved.step(Command::HardDrop);
/// assert_eq!(lock.unwrap().cleared_lines, 0);
/// assert_eq!(after_drop.stats().locked_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    active: ActivePiece,
    hold: HoldSlot,
    queue: LookaheadQueue,
    factory: PieceFactory,
    stats: GameStats,
    flags: GameFlags,
}

impl Game {
    /// Starts a new game after validating `config`.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self::with_seed(config, seed))
    }

    fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let mut factory = PieceFactory::with_seed(config.randomizer, seed);
        let active = ActivePiece::spawn(factory.next_kind());
        let queue = LookaheadQueue::new(config.queue_length, &mut factory);
        Self {
            grid: Grid::new(config.grid_height),
            active,
            hold: HoldSlot::default(),
            queue,
            factory,
            stats: GameStats::new(),
            flags: GameFlags::default(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Locked blocks only; see [`Game::render`] for the grid with the active piece.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    #[must_use]
    pub fn hold(&self) -> &HoldSlot {
        &self.hold
    }

    #[must_use]
    pub fn queue(&self) -> &LookaheadQueue {
        &self.queue
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn flags(&self) -> GameFlags {
        self.flags
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        match self.flags {
            GameFlags {
                game_over: true, ..
            } => GameStatus::GameOver,
            GameFlags {
                game_paused: true,
                ..
            } => GameStatus::Paused,
            _ => GameStatus::Playing,
        }
    }

    /// Where the active piece would come to rest if hard dropped.
    #[must_use]
    pub fn drop_position(&self) -> ActivePiece {
        let mut piece = self.active;
        while !self.collides(&piece.down()) {
            piece = piece.down();
        }
        piece
    }

    /// Applies `command` and returns the next snapshot.
    #[must_use]
    pub fn apply(&self, command: Command) -> Self {
        self.step(command).0
    }

    /// Like [`Self::apply`], also reporting the lock the command caused, if any.
    #[must_use]
    pub fn step(&self, command: Command) -> (Self, Option<LockEvent>) {
        let mut next = self.clone();
        let lock = next.execute(command);
        (next, lock)
    }

    fn execute(&mut self, command: Command) -> Option<LockEvent> {
        let playing = self.status().is_playing();
        match command {
            Command::Restart => *self = self.restarted(),
            Command::TogglePause => {
                if !self.flags.game_over {
                    self.flags.game_paused = !self.flags.game_paused;
                }
            }
            _ if !playing => {}
            Command::MoveLeft => {
                self.try_place(self.active.left());
            }
            Command::MoveRight => {
                self.try_place(self.active.right());
            }
            Command::MoveDown => {
                if !self.try_place(self.active.down()) {
                    return Some(self.lock());
                }
            }
            Command::HardDrop => {
                self.active = self.drop_position();
                return Some(self.lock());
            }
            Command::Rotate => self.rotate(),
            Command::Hold => self.use_hold(),
        }
        None
    }

    fn collides(&self, piece: &ActivePiece) -> bool {
        self.grid.collides(piece.shape(), piece.x(), piece.y())
    }

    fn try_place(&mut self, piece: ActivePiece) -> bool {
        if self.collides(&piece) {
            return false;
        }
        self.active = piece;
        true
    }

    fn rotate(&mut self) {
        let rotated = self.active.rotated_right();
        for dx in [0, 1, -1] {
            if self.try_place(rotated.shifted(dx, 0)) {
                return;
            }
        }
    }

    fn use_hold(&mut self) {
        if !self.config.hold_enabled || !self.hold.available {
            return;
        }

        let mut queue = self.queue.clone();
        let mut factory = self.factory.clone();
        let incoming = match self.hold.held {
            Some(shape) => shape.kind(),
            None => queue.pop(&mut factory),
        };
        let incoming = ActivePiece::spawn(incoming);
        if self.collides(&incoming) {
            return;
        }

        self.hold = HoldSlot {
            held: Some(self.active.unrotated_shape()),
            available: false,
        };
        self.active = incoming;
        self.queue = queue;
        self.factory = factory;
    }

    fn lock(&mut self) -> LockEvent {
        let (grid, cleared_lines) = self.grid.with_piece(&self.active).cleared();
        self.grid = grid;
        let score_delta = self.stats.record_lock(cleared_lines);

        self.active = ActivePiece::spawn(self.queue.pop(&mut self.factory));
        self.hold.available = true;
        if self.collides(&self.active) {
            self.flags.game_over = true;
        }

        LockEvent {
            cleared_lines,
            score_delta,
            level: self.stats.level(),
            topped_out: self.flags.game_over,
        }
    }

    /// A fresh game with the same config.
    ///
    /// A seeded config replays the same piece sequence; otherwise a new seed is drawn.
    #[must_use]
    pub fn restarted(&self) -> Self {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| self.factory.clone().fork_seed());
        Self::with_seed(self.config.clone(), seed)
    }
}

#[cfg(test)]
impl Game {
    /// Replaces the board of a fresh game, for setting up scenarios.
    pub(crate) fn with_board(self, grid: Grid, active: ActivePiece, stats: GameStats) -> Self {
        Self {
            grid,
            active,
            stats,
            ..self
        }
    }
}
