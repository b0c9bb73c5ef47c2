use arrayvec::ArrayVec;

use super::{cell::Cell, piece::PieceKind};

/// Largest side of any shape matrix (the I-piece box).
pub const MAX_SHAPE_SIZE: usize = 4;

type Matrix = [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];

/// One rotation state of a tetromino as an occupancy matrix.
///
/// Only the top-left `rows × cols` corner of the backing array is meaningful; the
/// rest is always `false`, so derived equality compares shapes exactly.
///
/// Box sizes are 4×4 for I, 2×2 for O and 3×3 for the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    kind: PieceKind,
    rows: u8,
    cols: u8,
    cells: Matrix,
}

const fn matrix<const N: usize>(src: [[bool; N]; N]) -> Matrix {
    let mut m = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
    let mut r = 0;
    while r < N {
        let mut c = 0;
        while c < N {
            m[r][c] = src[r][c];
            c += 1;
        }
        r += 1;
    }
    m
}

impl Shape {
    /// Base (rotation-0) matrix of `kind`.
    #[must_use]
    pub const fn base(kind: PieceKind) -> Self {
        const C: bool = true;
        const E: bool = false;

        let (size, cells) = match kind {
            PieceKind::I => (
                4,
                matrix([[E, E, E, E], [C, C, C, C], [E, E, E, E], [E, E, E, E]]),
            ),
            PieceKind::J => (3, matrix([[C, E, E], [C, C, C], [E, E, E]])),
            PieceKind::L => (3, matrix([[E, E, C], [C, C, C], [E, E, E]])),
            PieceKind::O => (2, matrix([[C, C], [C, C]])),
            PieceKind::S => (3, matrix([[E, C, C], [C, C, E], [E, E, E]])),
            PieceKind::T => (3, matrix([[E, C, E], [C, C, C], [E, E, E]])),
            PieceKind::Z => (3, matrix([[C, C, E], [E, C, C], [E, E, E]])),
        };
        Self {
            kind,
            rows: size,
            cols: size,
            cells,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows as usize
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Returns whether the matrix cell at `(row, col)` is occupied.
    ///
    /// Anything outside the matrix is unoccupied.
    #[must_use]
    pub const fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    /// Rotates 90° clockwise: `rotated[c][R-1-r] = original[r][c]`.
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < rows {
            let mut c = 0;
            while c < cols {
                cells[c][rows - 1 - r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            kind: self.kind,
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Rotates 90° counter-clockwise, the inverse of [`Self::rotated_right`].
    #[must_use]
    pub const fn rotated_left(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < rows {
            let mut c = 0;
            while c < cols {
                cells[cols - 1 - c][r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            kind: self.kind,
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Offsets `(dx, dy)` of the occupied cells, row by row.
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.cols())
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (col as i32, row as i32))
        })
    }

    /// The matrix as cells, keeping only rows that contain at least one block.
    ///
    /// This is the compact form shown in the hold and next panels.
    #[must_use]
    pub fn trimmed(&self) -> ArrayVec<ArrayVec<Cell, MAX_SHAPE_SIZE>, MAX_SHAPE_SIZE> {
        (0..self.rows())
            .filter(|&row| self.cells[row].iter().any(|&b| b))
            .map(|row| {
                (0..self.cols())
                    .map(|col| {
                        if self.cells[row][col] {
                            Cell::Filled(self.kind)
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_blocks() {
        for kind in PieceKind::ALL {
            let shape = Shape::base(kind);
            assert_eq!(shape.occupied_offsets().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_box_sizes() {
        assert_eq!((Shape::base(PieceKind::I).rows(), Shape::base(PieceKind::I).cols()), (4, 4));
        assert_eq!((Shape::base(PieceKind::O).rows(), Shape::base(PieceKind::O).cols()), (2, 2));
        for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
            let shape = Shape::base(kind);
            assert_eq!((shape.rows(), shape.cols()), (3, 3), "{kind:?}");
        }
    }

    #[test]
    fn test_four_rotations_return_original() {
        for kind in PieceKind::ALL {
            let base = Shape::base(kind);
            let mut shape = base;
            for _ in 0..4 {
                shape = shape.rotated_right();
            }
            assert_eq!(shape, base, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_is_clockwise() {
        // .X.      .X.
        // XXX  ->  .XX
        // ...      .X.
        let t = Shape::base(PieceKind::T).rotated_right();
        let expected = [[false, true, false], [false, true, true], [false, true, false]];
        for (r, row) in expected.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                assert_eq!(t.is_occupied(r, c), cell, "({r}, {c})");
            }
        }
    }

    #[test]
    fn test_rotated_left_inverts_rotated_right() {
        for kind in PieceKind::ALL {
            let base = Shape::base(kind);
            assert_eq!(base.rotated_right().rotated_left(), base, "{kind:?}");
            assert_eq!(base.rotated_left(), base.rotated_right().rotated_right().rotated_right());
        }
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let o = Shape::base(PieceKind::O);
        assert_eq!(o.rotated_right(), o);
    }

    #[test]
    fn test_trimmed_drops_empty_rows() {
        let i = Shape::base(PieceKind::I).trimmed();
        assert_eq!(i.len(), 1);
        assert!(i[0].iter().all(|c| *c == Cell::Filled(PieceKind::I)));

        let t = Shape::base(PieceKind::T).trimmed();
        assert_eq!(t.len(), 2);
        assert_eq!(
            t[0].as_slice(),
            &[Cell::Empty, Cell::Filled(PieceKind::T), Cell::Empty]
        );

        // A vertical I keeps all four rows but only one filled column each.
        let vertical = Shape::base(PieceKind::I).rotated_right().trimmed();
        assert_eq!(vertical.len(), 4);
    }
}
