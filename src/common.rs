//! Common types for the engine: shot outcomes and the error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitboard::BitBoardError;

/// Outcome of firing at a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackResult {
    /// Cell was already fired upon or lies outside the grid. Nothing changed.
    Invalid,
    /// Shot landed in open water.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot hit the last intact segment of a ship.
    HitAndSunk,
    /// Shot sank the last ship of the fleet.
    FleetDefeated,
}

impl AttackResult {
    /// Whether the shot struck a ship segment.
    pub fn is_hit(self) -> bool {
        matches!(
            self,
            AttackResult::Hit | AttackResult::HitAndSunk | AttackResult::FleetDefeated
        )
    }

    /// Whether the attacker fires again immediately.
    pub fn grants_follow_up(self) -> bool {
        matches!(self, AttackResult::Hit | AttackResult::HitAndSunk)
    }
}

/// Why an attack request was turned away before reaching the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidAttack {
    /// The target cell is already `Hit` or `Miss`.
    AlreadyFired,
    /// The requesting side is not the active side.
    OutOfTurn,
    /// Ships are still being placed.
    PlacementInProgress,
    /// The match already has a winner.
    MatchFinished,
}

/// Errors returned by engine operations. None of them leave partial state
/// behind: the caller may retry with different input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("coordinate ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("ship would overlap or touch another ship")]
    OverlapOrAdjacency,
    #[error("ship size {0} is not allowed")]
    InvalidShipSize(usize),
    #[error("no more ships of size {0} may be placed")]
    CompositionExceeded(usize),
    #[error("not every ship of the fleet has been placed")]
    PlacementIncomplete,
    #[error("unable to place the fleet randomly")]
    UnableToPlaceFleet,
    #[error("command not allowed in the current phase")]
    WrongPhase,
    #[error("attack rejected: {0:?}")]
    InvalidAttack(InvalidAttack),
    #[error("no targetable cells remain")]
    NoTargetsRemaining,
    /// The grid marks a ship segment that no ship in the fleet covers.
    #[error("ship segment at ({row}, {col}) belongs to no ship in the fleet")]
    UnownedShipCell { row: usize, col: usize },
    #[error("unknown difficulty '{0}', expected easy, medium or hard")]
    UnknownDifficulty(String),
}

impl From<BitBoardError> for EngineError {
    fn from(err: BitBoardError) -> Self {
        let BitBoardError::IndexOutOfBounds { row, col } = err;
        EngineError::OutOfBounds { row, col }
    }
}

impl From<InvalidAttack> for EngineError {
    fn from(reason: InvalidAttack) -> Self {
        EngineError::InvalidAttack(reason)
    }
}
