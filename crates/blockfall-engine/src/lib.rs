//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - plain data: cells, tetromino shapes, the grid and its collision check
//! - [`engine`] - rules: piece generation, the game state machine, scoring and timing
//!
//! Every game command is a pure transform over an immutable [`Game`] snapshot.
//! Rendering and keyboard handling live outside this crate.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
