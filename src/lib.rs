//! Game engine for two-board naval combat: grids, fleet placement, shot
//! resolution, computer opponents and the match state machine.

mod ai;
mod attack;
mod bitboard;
mod common;
mod config;
mod fleet;
mod game;
mod grid;
mod logging;
pub mod prelude;
mod scores;
mod ship;

pub use ai::*;
pub use attack::*;
pub use bitboard::{BitBoard, BitBoardError};
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use grid::*;
pub use logging::{init_logging, LOG_ENV};
pub use scores::*;
pub use ship::*;
