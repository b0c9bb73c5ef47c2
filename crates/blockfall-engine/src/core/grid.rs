use std::iter;

use super::{cell::Cell, piece::ActivePiece, shape::Shape};

/// Number of columns of every grid.
pub const WIDTH: usize = 10;

/// One grid row.
pub type Row = [Cell; WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; WIDTH];

/// The field of locked blocks.
///
/// Row 0 is the top. The height is fixed when the grid is created and every
/// operation that removes rows pads the top back to that height.
///
/// Operations that change the grid consume or clone it and return a new value;
/// nothing mutates a grid through a shared reference.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Grid, PieceKind};
///
/// let grid = Grid::new(20);
/// let piece = ActivePiece::spawn(PieceKind::O);
/// assert!(!grid.collides(piece.shape(), piece.x(), piece.y()));
/// assert!(grid.collides(piece.shape(), piece.x(), 19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Creates an all-empty grid with `height` rows.
    #[must_use]
    pub fn new(height: usize) -> Self {
        Self {
            rows: vec![EMPTY_ROW; height],
        }
    }

    /// Creates a grid from explicit rows, top row first.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the cell at column `x`, row `y`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns whether `shape` placed with its top-left corner at `(x, y)` overlaps a
    /// filled cell or leaves the grid through the left, right or bottom edge.
    ///
    /// Blocks above row 0 are never a collision. The check has no side effects.
    #[must_use]
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.occupied_offsets().any(|(dx, dy)| {
            let (gx, gy) = (x + dx, y + dy);
            if gy < 0 {
                return !usize::try_from(gx).is_ok_and(|gx| gx < WIDTH);
            }
            self.cell(gx, gy).is_none_or(Cell::is_filled)
        })
    }

    /// Writes every block of `piece` into a copy of the grid.
    ///
    /// Blocks outside the grid are dropped.
    #[must_use]
    pub fn with_piece(&self, piece: &ActivePiece) -> Self {
        let mut rows = self.rows.clone();
        let cell = Cell::Filled(piece.kind());
        for (x, y) in piece.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(target) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *target = cell;
            }
        }
        Self { rows }
    }

    /// Removes every fully occupied row and pads the top with empty rows.
    ///
    /// Surviving rows keep their relative order. Returns the new grid and the number
    /// of rows removed.
    #[must_use]
    pub fn cleared(self) -> (Self, usize) {
        let height = self.height();
        let kept: Vec<Row> = self
            .rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| cell.is_empty()))
            .collect();
        let cleared = height - kept.len();
        let rows = iter::repeat_n(EMPTY_ROW, cleared).chain(kept).collect();
        (Self { rows }, cleared)
    }
}

/// Free-function form of [`Grid::collides`].
#[must_use]
pub fn collides(grid: &Grid, shape: &Shape, x: i32, y: i32) -> bool {
    grid.collides(shape, x, y)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::PieceKind;

    /// Builds a grid of `height` rows whose bottom rows are given as patterns.
    ///
    /// `#` is a filled cell (tagged as a Z block), anything else is empty.
    pub(crate) fn grid_with_bottom(height: usize, bottom: &[&str]) -> Grid {
        let mut rows = vec![EMPTY_ROW; height - bottom.len()];
        for pattern in bottom {
            let mut row = EMPTY_ROW;
            for (cell, ch) in iter::zip(&mut row, pattern.chars()) {
                if ch == '#' {
                    *cell = Cell::Filled(PieceKind::Z);
                }
            }
            rows.push(row);
        }
        Grid::from_rows(rows)
    }
}
