use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{cell::Color, shape::Shape};

/// Column of the top-left corner of a freshly spawned piece.
pub const SPAWN_X: i32 = 3;
/// Row of the top-left corner of a freshly spawned piece.
pub const SPAWN_Y: i32 = 0;

/// The seven tetrominoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All kinds in canonical order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Fixed color tag of this kind.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::J => Color::Blue,
            PieceKind::L => Color::Orange,
            PieceKind::O => Color::Yellow,
            PieceKind::S => Color::Green,
            PieceKind::T => Color::Purple,
            PieceKind::Z => Color::Red,
        }
    }

    /// Returns the rotation-0 matrix of this kind.
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        Shape::base(self)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('Z'), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Rotation((self.0 + 3) % 4)
    }
}

/// The piece currently under player control.
///
/// `x`/`y` locate the top-left corner of the shape's bounding box on the grid and may be
/// negative when the box hangs over the left edge with empty columns.
///
/// Pieces are values: every movement returns a new `ActivePiece`.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, PieceKind};
///
/// let piece = ActivePiece::spawn(PieceKind::T);
/// let moved = piece.shifted(1, 0).rotated_right();
/// assert_eq!(moved.x(), piece.x() + 1);
/// assert_eq!(moved.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    shape: Shape,
    rotation: Rotation,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Creates a piece of `kind` in its base orientation at the spawn position.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            shape: Shape::base(kind),
            rotation: Rotation(0),
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.shape.kind()
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.shape.kind().color()
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.shifted(0, 1)
    }

    /// Rotates the shape 90° clockwise in place (no kicks).
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self {
            shape: self.shape.rotated_right(),
            rotation: self.rotation.rotated_right(),
            ..self
        }
    }

    /// Rotates the shape 90° counter-clockwise in place (no kicks).
    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self {
            shape: self.shape.rotated_left(),
            rotation: self.rotation.rotated_left(),
            ..self
        }
    }

    /// Undoes the current rotation count, returning the rotation-0 matrix.
    #[must_use]
    pub const fn unrotated_shape(&self) -> Shape {
        let mut shape = self.shape;
        let mut i = 0;
        while i < self.rotation.0 {
            shape = shape.rotated_left();
            i += 1;
        }
        shape
    }

    /// Absolute grid coordinates `(x, y)` of every occupied block.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_color_table() {
        let colors = PieceKind::ALL.map(PieceKind::color);
        assert_eq!(
            colors,
            [
                Color::Cyan,
                Color::Blue,
                Color::Orange,
                Color::Yellow,
                Color::Green,
                Color::Purple,
                Color::Red
            ]
        );
    }

    #[test]
    fn test_rotation_wraps() {
        let mut rotation = Rotation::default();
        for expected in [1, 2, 3, 0] {
            rotation = rotation.rotated_right();
            assert_eq!(rotation.index(), expected);
        }
        assert_eq!(Rotation::default().rotated_left().index(), 3);
    }

    #[test]
    fn test_spawn_position() {
        let piece = ActivePiece::spawn(PieceKind::O);
        assert_eq!((piece.x(), piece.y()), (SPAWN_X, SPAWN_Y));
        assert_eq!(piece.rotation(), Rotation::default());
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(3, 0), (4, 0), (3, 1), (4, 1)]);
    }

    #[test]
    fn test_unrotated_shape_restores_base() {
        for kind in PieceKind::ALL {
            let mut piece = ActivePiece::spawn(kind);
            for _ in 0..4 {
                assert_eq!(piece.unrotated_shape(), kind.base_shape(), "{kind:?}");
                piece = piece.rotated_right();
            }
        }
    }
}
