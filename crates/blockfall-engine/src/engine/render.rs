use arrayvec::ArrayVec;

use crate::{Cell, Grid, MAX_SHAPE_SIZE};

use super::{
    game::{Game, GameStatus},
    scoring::GameStats,
};

/// A shape cut down to the rows that contain blocks.
pub type TrimmedShape = ArrayVec<ArrayVec<Cell, MAX_SHAPE_SIZE>, MAX_SHAPE_SIZE>;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderView {
    /// Locked blocks with the active piece merged in.
    pub cells: Grid,
    /// Upcoming pieces, front first.
    pub next: Vec<TrimmedShape>,
    pub held: Option<TrimmedShape>,
    pub stats: GameStats,
    pub status: GameStatus,
    /// Whether the hold slot can be used by the current piece.
    pub hold_available: bool,
}

impl Game {
    /// Builds the render view of this snapshot.
    ///
    /// The active piece is merged even once the game is over, so the piece that failed
    /// to spawn stays visible.
    #[must_use]
    pub fn render(&self) -> RenderView {
        RenderView {
            cells: self.grid().with_piece(self.active()),
            next: self.queue().shapes().map(|shape| shape.trimmed()).collect(),
            held: self.hold().held().map(|shape| shape.trimmed()),
            stats: self.stats().clone(),
            status: self.status(),
            hold_available: self.config().hold_enabled && self.hold().is_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, GameConfig, PieceKind, PieceSeed, Shape};

    fn game() -> Game {
        Game::new(GameConfig::default().with_seed(PieceSeed::from_u128(5))).unwrap()
    }

    #[test]
    fn test_active_piece_is_merged() {
        let game = game();
        let view = game.render();
        let merged: Vec<_> = view
            .cells
            .rows()
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_filled())
                    .map(move |(x, _)| (i32::try_from(x).unwrap(), i32::try_from(y).unwrap()))
            })
            .collect();
        let mut expected: Vec<_> = game.active().cells().collect();
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(merged, expected);
        // The locked grid itself is untouched.
        assert_eq!(game.grid(), &Grid::new(20));
    }

    #[test]
    fn test_next_and_held_are_trimmed() {
        let game = game().apply(Command::Hold);
        let view = game.render();
        assert_eq!(view.next.len(), 6);
        for (trimmed, kind) in view.next.iter().zip(game.queue().kinds()) {
            assert_eq!(trimmed, &Shape::base(kind).trimmed());
        }
        let held = view.held.unwrap();
        let kind = game.hold().held().unwrap().kind();
        let expected_rows = if kind == PieceKind::I { 1 } else { 2 };
        assert_eq!(held.len(), expected_rows);
        assert!(!view.hold_available);
    }

    #[test]
    fn test_status_follows_flags() {
        let view = game().apply(Command::TogglePause).render();
        assert_eq!(view.status, GameStatus::Paused);
        assert!(view.held.is_none());
    }
}
