//! Attack resolution against one side's grid and fleet.

use log::{debug, warn};

use crate::common::AttackResult;
use crate::fleet::Fleet;
use crate::grid::{Cell, Coord, Grid};

/// A resolved shot: the defender's grid and fleet after the shot, and what
/// the shot did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attack {
    pub grid: Grid,
    pub fleet: Fleet,
    pub result: AttackResult,
}

impl Attack {
    fn unchanged(grid: &Grid, fleet: &Fleet) -> Self {
        Attack {
            grid: *grid,
            fleet: fleet.clone(),
            result: AttackResult::Invalid,
        }
    }
}

/// Fire at `coord`. Already-resolved and out-of-bounds cells yield
/// `AttackResult::Invalid` with the pair returned unchanged.
pub fn attack(grid: &Grid, fleet: &Fleet, coord: Coord) -> Attack {
    let cell = match grid.get(coord) {
        Ok(cell) if cell.is_targetable() => cell,
        _ => return Attack::unchanged(grid, fleet),
    };
    let Ok(next_grid) = grid.with_shot(coord) else {
        return Attack::unchanged(grid, fleet);
    };

    if cell == Cell::Empty {
        debug!("shot at {} missed", coord);
        return Attack {
            grid: next_grid,
            fleet: fleet.clone(),
            result: AttackResult::Miss,
        };
    }

    let Some((index, ship)) = fleet.ship_at(coord) else {
        warn!("ship segment at {} has no owner in the fleet", coord);
        return Attack::unchanged(grid, fleet);
    };
    let struck = ship.struck(coord);
    let next_fleet = fleet.with_replaced(index, struck);
    let result = if next_fleet.is_defeated() {
        AttackResult::FleetDefeated
    } else if struck.is_sunk() {
        AttackResult::HitAndSunk
    } else {
        AttackResult::Hit
    };
    debug!("shot at {} -> {:?}", coord, result);
    Attack {
        grid: next_grid,
        fleet: next_fleet,
        result,
    }
}
