use serde::{Deserialize, Serialize};

use super::piece::PieceKind;

/// A single grid cell.
///
/// An occupied cell remembers which tetromino it came from, which in turn fixes its
/// color tag. Cells carry no other payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty,
    /// Occupied by a block of the given piece kind.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        !self.is_empty()
    }

    /// Returns the color tag of an occupied cell.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind.color()),
        }
    }
}

/// Color tag of a tetromino, one per piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[display("cyan")]
    Cyan,
    #[display("blue")]
    Blue,
    #[display("orange")]
    Orange,
    #[display("yellow")]
    Yellow,
    #[display("green")]
    Green,
    #[display("purple")]
    Purple,
    #[display("red")]
    Red,
}
