//! Commonly used types and utilities for ease of import.

pub use crate::{
    AttackResult, Cell, Command, Contender, Controller, Coord, Difficulty, EngineError, Grid,
    Leaderboard, Match, MatchEvent, MatchOutcome, Orientation, Phase, ScoreLedger, Side,
    BOARD_SIZE, FLEET_COMPOSITION,
};
