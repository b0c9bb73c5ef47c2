pub use self::{cell::*, grid::*, piece::*, shape::*};

pub(crate) mod cell;
pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod shape;
