//! Game rules built on the [`core`](crate::core) data types.
//!
//! - [`Game`] - immutable snapshot with pure command transforms
//! - [`GameDriver`] - feeds frame ticks and key events into a game
//! - [`PieceFactory`] / [`LookaheadQueue`] - piece generation and preview
//! - [`GameStats`] - score, lines and level

pub use self::{
    config::*, driver::*, game::*, lookahead::*, piece_factory::*, render::*, scoring::*,
    timing::*,
};

mod config;
mod driver;
mod game;
mod lookahead;
mod piece_factory;
mod render;
mod scoring;
mod timing;
